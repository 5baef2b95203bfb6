//! Read-only render snapshot for the presentation layer
//!
//! Nothing here feeds back into the simulation.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

use super::state::{MixPhase, MixState};
use crate::consts::WARMUP_TICKS;
use crate::tuning::MixTuning;

/// Seeds are drawn this many times their collision radius
pub const SPRITE_SCALE: f32 = 3.0;
/// Tutorial hand circles the bowl at this radius
const TUTORIAL_HAND_RADIUS: f32 = 120.0;
/// Clock turns red at or below this many seconds
const LOW_TIME_WARNING: f32 = 3.0;

/// Dough sprite set, chosen by progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoughStage {
    A,
    B,
    C,
    D,
    /// Fully mixed
    E,
}

impl DoughStage {
    /// Stage for a progress value; no dough is visible at 20% or below
    pub fn for_progress(progress: f32) -> Option<Self> {
        if progress <= 20.0 {
            None
        } else if progress <= 40.0 {
            Some(DoughStage::A)
        } else if progress <= 60.0 {
            Some(DoughStage::B)
        } else if progress <= 80.0 {
            Some(DoughStage::C)
        } else if progress < 100.0 {
            Some(DoughStage::D)
        } else {
            Some(DoughStage::E)
        }
    }
}

/// Speech-bubble encouragement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MixMessage {
    /// "Mix the dough well!"
    MixWell,
    /// "More! More!"
    More,
    /// "Keep it up!"
    KeepGoing,
    /// "Done!"
    Done,
}

impl MixMessage {
    pub fn for_progress(progress: f32) -> Self {
        if progress >= 100.0 {
            MixMessage::Done
        } else if progress > 50.0 {
            MixMessage::KeepGoing
        } else if progress >= 20.0 {
            MixMessage::More
        } else {
            MixMessage::MixWell
        }
    }
}

/// One seed as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub img_index: u8,
    pub alpha: f32,
    pub settled: bool,
}

/// GPU instance record for one seed sprite
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SeedInstance {
    pub center: [f32; 2],
    pub size: f32,
    pub alpha: f32,
    pub variant: u32,
    pub _pad: [u32; 3],
}

/// Snapshot of everything the presentation layer draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub particles: Vec<ParticleView>,
    pub progress: f32,
    pub time_left: f32,
    pub phase: MixPhase,
    /// Whole seconds shown on the clock (rounded up)
    pub clock_seconds: u32,
    /// Clock drawn in warning color
    pub low_time: bool,
    pub dough: Option<DoughStage>,
    pub knead_frame: u8,
    /// Only shown while mixing
    pub message: Option<MixMessage>,
    /// Pulsing "start!" banner scale during warm-up
    pub start_banner_scale: Option<f32>,
    /// Tutorial hand position while the overlay is up
    pub tutorial_hand: Option<Vec2>,
}

impl RenderState {
    pub fn capture(state: &MixState, tuning: &MixTuning) -> Self {
        let progress = state.progress;
        let particles = state
            .particles
            .iter()
            .map(|p| ParticleView {
                pos: p.pos,
                radius: p.radius,
                img_index: p.img_index,
                alpha: p.alpha(progress),
                settled: p.settled,
            })
            .collect();

        let mixing = state.phase == MixPhase::Mixing;
        let start_banner_scale = (mixing && !state.show_tutorial && !state.mixing_started)
            .then(|| 1.0 + (state.warmup_ticks.min(WARMUP_TICKS) as f32 * 0.2).sin() * 0.1);
        let tutorial_hand = (mixing && state.show_tutorial).then(|| {
            let angle = state.tutorial_ticks as f32 * 0.1;
            tuning.bowl_center + Vec2::new(angle.cos(), angle.sin()) * TUTORIAL_HAND_RADIUS
        });

        Self {
            particles,
            progress,
            time_left: state.time_left,
            phase: state.phase,
            clock_seconds: state.time_left.max(0.0).ceil() as u32,
            low_time: state.time_left <= LOW_TIME_WARNING,
            dough: DoughStage::for_progress(progress),
            knead_frame: state.knead_frame,
            message: mixing.then(|| MixMessage::for_progress(progress)),
            start_banner_scale,
            tutorial_hand,
        }
    }

    /// Sprite instances for seeds that are still visible
    pub fn instances(&self) -> Vec<SeedInstance> {
        self.particles
            .iter()
            .filter(|p| p.alpha > 0.0)
            .map(|p| SeedInstance {
                center: p.pos.to_array(),
                size: p.radius * SPRITE_SCALE,
                alpha: p.alpha,
                variant: p.img_index as u32,
                _pad: [0; 3],
            })
            .collect()
    }

    /// Instance data as raw bytes for a vertex buffer upload
    pub fn instance_bytes(&self) -> Vec<u8> {
        let instances = self.instances();
        bytemuck::cast_slice::<SeedInstance, u8>(&instances).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dough_stages() {
        assert_eq!(DoughStage::for_progress(0.0), None);
        assert_eq!(DoughStage::for_progress(20.0), None);
        assert_eq!(DoughStage::for_progress(20.5), Some(DoughStage::A));
        assert_eq!(DoughStage::for_progress(60.0), Some(DoughStage::B));
        assert_eq!(DoughStage::for_progress(99.5), Some(DoughStage::D));
        assert_eq!(DoughStage::for_progress(100.0), Some(DoughStage::E));
    }

    #[test]
    fn test_messages() {
        assert_eq!(MixMessage::for_progress(5.0), MixMessage::MixWell);
        assert_eq!(MixMessage::for_progress(20.0), MixMessage::More);
        assert_eq!(MixMessage::for_progress(50.0), MixMessage::More);
        assert_eq!(MixMessage::for_progress(51.0), MixMessage::KeepGoing);
        assert_eq!(MixMessage::for_progress(100.0), MixMessage::Done);
    }

    #[test]
    fn test_capture_pouring() {
        let tuning = MixTuning::default();
        let state = MixState::new(4, 3, &tuning, true);
        let view = RenderState::capture(&state, &tuning);
        assert_eq!(view.particles.len(), 15);
        assert_eq!(view.phase, MixPhase::Pouring);
        assert_eq!(view.clock_seconds, 10);
        assert!(!view.low_time);
        assert!(view.message.is_none());
        assert!(view.tutorial_hand.is_none());
        assert!(view.start_banner_scale.is_none());
    }

    #[test]
    fn test_capture_mixing_overlays() {
        let tuning = MixTuning::default();
        let mut state = MixState::new(4, 3, &tuning, true);
        state.phase = MixPhase::Mixing;
        let view = RenderState::capture(&state, &tuning);
        assert_eq!(view.tutorial_hand, Some(tuning.bowl_center + Vec2::new(120.0, 0.0)));
        assert!(view.start_banner_scale.is_none());

        state.show_tutorial = false;
        let view = RenderState::capture(&state, &tuning);
        assert_eq!(view.start_banner_scale, Some(1.0));
        assert_eq!(view.message, Some(MixMessage::MixWell));
    }

    #[test]
    fn test_faded_seeds_are_not_instanced() {
        let tuning = MixTuning::default();
        let mut state = MixState::new(4, 2, &tuning, false);
        state.progress = 100.0;
        state.particles[0].vanish_threshold = 95.0;
        state.particles[1].vanish_threshold = 50.0;
        let view = RenderState::capture(&state, &tuning);
        let instances = view.instances();
        assert!(instances.iter().all(|i| i.alpha > 0.0));
        assert!(instances.len() < view.particles.len());
        assert_eq!(
            view.instance_bytes().len(),
            instances.len() * std::mem::size_of::<SeedInstance>()
        );
    }
}
