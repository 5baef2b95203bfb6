//! Mixing session state
//!
//! Everything one mixing session mutates lives here. A fresh state is built
//! per session and dropped when the session ends.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particle::{Particle, spawn_particles};
use crate::cues::Cue;
use crate::tuning::MixTuning;

/// Current phase of the mixing minigame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixPhase {
    /// Seeds are still falling into the bowl
    Pouring,
    /// Every seed has landed; sliding toward the center until the pour ends
    Settling,
    /// Player kneads the dough against the clock
    Mixing,
    /// Timer ran out; state is frozen for the result screen
    TimeUp,
}

impl MixPhase {
    /// Pour-physics phases
    pub fn is_pouring(self) -> bool {
        matches!(self, MixPhase::Pouring | MixPhase::Settling)
    }
}

/// Pointer sample for one frame, already in simulation coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub pos: Vec2,
    /// Button or touch is held
    pub pressed: bool,
    /// Press started this frame
    pub just_pressed: bool,
}

impl PointerSample {
    pub fn idle(pos: Vec2) -> Self {
        Self {
            pos,
            pressed: false,
            just_pressed: false,
        }
    }

    pub fn held(pos: Vec2) -> Self {
        Self {
            pos,
            pressed: true,
            just_pressed: false,
        }
    }

    pub fn press(pos: Vec2) -> Self {
        Self {
            pos,
            pressed: true,
            just_pressed: true,
        }
    }
}

/// Side effects raised by a tick, drained by the owning session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixEvent {
    /// Play a sound cue
    Cue(Cue),
    /// Silence every cue still ringing
    StopCues,
    /// Player dismissed the knead tutorial
    TutorialSeen,
    /// Phase transition
    PhaseChanged { from: MixPhase, to: MixPhase },
}

/// Complete state of one mixing session
#[derive(Debug, Clone)]
pub struct MixState {
    /// RNG seed the session was poured with
    pub seed: u64,
    /// Quantity the player asked for (before the visual cap)
    pub quantity: u32,
    /// Poured seeds; count fixed for the whole session
    pub particles: Vec<Particle>,
    pub phase: MixPhase,
    /// How mixed the dough is, 0-100
    pub progress: f32,
    /// Cumulative pointer travel while dragging inside the bowl
    pub drag_distance: f32,
    /// Seconds left on the mixing clock
    pub time_left: f32,
    /// Simulated frames since the session began
    pub time_ticks: u64,
    /// Frames spent in the pour phases
    pub pour_ticks: u32,
    /// Frames of "start!" animation played so far
    pub warmup_ticks: u32,
    /// Warm-up finished; timer and agitation are live
    pub mixing_started: bool,
    /// Knead tutorial overlay is blocking the mix phase
    pub show_tutorial: bool,
    /// Frames the tutorial overlay has been up (drives the hand animation)
    pub tutorial_ticks: u32,
    /// Pointer position seen on the previous mixing frame
    pub last_pointer: Vec2,
    /// Frames until the next "mix" cue may play
    pub mix_cue_cooldown: u32,
    /// Frames until the next "knead" cue may play
    pub knead_cue_cooldown: u32,
    /// Ticks toward the next knead animation frame
    pub knead_anim_ticks: u32,
    /// Current knead animation frame
    pub knead_frame: u8,
    /// Pending side effects
    pub events: Vec<MixEvent>,
    /// Session RNG (agitation jitter)
    pub rng: Pcg32,
}

impl MixState {
    /// Pour a new session: `quantity` is capped visually and each unit
    /// becomes several falling seeds
    pub fn new(seed: u64, quantity: u32, tuning: &MixTuning, show_tutorial: bool) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = spawn_particles(&mut rng, crate::particle_count(quantity), tuning);

        Self {
            seed,
            quantity,
            particles,
            phase: MixPhase::Pouring,
            progress: 0.0,
            drag_distance: 0.0,
            time_left: tuning.mix_duration,
            time_ticks: 0,
            pour_ticks: 0,
            warmup_ticks: 0,
            mixing_started: false,
            show_tutorial,
            tutorial_ticks: 0,
            last_pointer: tuning.bowl_center,
            mix_cue_cooldown: 0,
            knead_cue_cooldown: 0,
            knead_anim_ticks: 0,
            knead_frame: 0,
            events: Vec::new(),
            rng,
        }
    }

    /// Move to `to`, recording the transition
    pub fn set_phase(&mut self, to: MixPhase) {
        if self.phase != to {
            self.events.push(MixEvent::PhaseChanged {
                from: self.phase,
                to,
            });
            self.phase = to;
        }
    }

    pub fn cue(&mut self, cue: Cue) {
        self.events.push(MixEvent::Cue(cue));
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<MixEvent> {
        std::mem::take(&mut self.events)
    }

    /// All seeds have touched the bowl floor
    pub fn all_landed(&self) -> bool {
        self.particles.iter().all(|p| p.landed)
    }

    /// Whether the mixing clock is running this frame
    pub fn clock_running(&self) -> bool {
        self.phase == MixPhase::Mixing && self.mixing_started && !self.show_tutorial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_pouring() {
        let tuning = MixTuning::default();
        let state = MixState::new(1, 10, &tuning, false);
        assert_eq!(state.phase, MixPhase::Pouring);
        assert_eq!(state.particles.len(), 50);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.time_left, tuning.mix_duration);
        assert!(!state.all_landed());
        assert!(!state.clock_running());
    }

    #[test]
    fn test_quantity_is_capped() {
        let tuning = MixTuning::default();
        assert_eq!(MixState::new(1, 999, &tuning, false).particles.len(), 150);
        assert!(MixState::new(1, 0, &tuning, false).particles.is_empty());
    }

    #[test]
    fn test_set_phase_records_once() {
        let mut state = MixState::new(1, 1, &MixTuning::default(), false);
        state.set_phase(MixPhase::Mixing);
        state.set_phase(MixPhase::Mixing);
        assert_eq!(
            state.drain_events(),
            vec![MixEvent::PhaseChanged {
                from: MixPhase::Pouring,
                to: MixPhase::Mixing
            }]
        );
        assert!(state.events.is_empty());
    }
}
