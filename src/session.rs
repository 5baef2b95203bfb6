//! Mixing session lifecycle
//!
//! [`MixGame`] owns at most one live session plus the host ports it reports
//! to. Each `begin` pours a brand new session; `end` scores and discards it.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SCORE;
use crate::cues::{Cue, CuePlayer};
use crate::sim::{MixEvent, MixPhase, MixState, PointerSample, RenderState, tick};
use crate::tuning::MixTuning;

/// Callback told how much material a session consumed
pub type MaterialConsumer = Box<dyn FnMut(u32)>;

/// Final result of a mixing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixScore {
    pub score: u32,
}

impl MixScore {
    /// Linear in progress, capped at [`MAX_SCORE`]
    pub fn from_progress(progress: f32, tuning: &MixTuning) -> Self {
        let progress = progress.clamp(0.0, 100.0);
        let score = (progress * tuning.score_per_progress).floor() as u32;
        Self {
            score: score.min(MAX_SCORE),
        }
    }
}

/// Owner of the mixing minigame
pub struct MixGame {
    tuning: MixTuning,
    next_seed: u64,
    session: Option<MixState>,
    /// Score of the last ended session, kept until the next `begin`
    finished: Option<MixScore>,
    tutorial_seen: bool,
    cues: Option<Box<dyn CuePlayer>>,
    consume_materials: Option<MaterialConsumer>,
}

impl MixGame {
    /// Create a game with no session; `seed` seeds the first session and
    /// each later session takes the next seed
    pub fn new(tuning: MixTuning, seed: u64) -> Self {
        Self {
            tuning,
            next_seed: seed,
            session: None,
            finished: None,
            tutorial_seen: false,
            cues: None,
            consume_materials: None,
        }
    }

    /// Attach a sound cue player
    pub fn with_cue_player(mut self, player: Box<dyn CuePlayer>) -> Self {
        self.cues = Some(player);
        self
    }

    /// Attach the material-consumption callback
    pub fn with_material_consumer(mut self, consumer: impl FnMut(u32) + 'static) -> Self {
        self.consume_materials = Some(Box::new(consumer));
        self
    }

    /// Seed the persisted tutorial flag
    pub fn with_tutorial_seen(mut self, seen: bool) -> Self {
        self.tutorial_seen = seen;
        self
    }

    pub fn tuning(&self) -> &MixTuning {
        &self.tuning
    }

    /// Whether the knead tutorial has been dismissed (host persists this)
    pub fn tutorial_seen(&self) -> bool {
        self.tutorial_seen
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&MixState> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut MixState> {
        self.session.as_mut()
    }

    /// Start a new session, discarding any live one without a score
    pub fn begin(&mut self, quantity: u32) {
        if let Some(old) = self.session.take() {
            log::warn!(
                "Replacing unfinished mixing session (seed {}, progress {:.1})",
                old.seed,
                old.progress
            );
        }

        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);

        if let Some(consume) = self.consume_materials.as_mut() {
            consume(quantity);
        }

        let state = MixState::new(seed, quantity, &self.tuning, !self.tutorial_seen);
        log::info!(
            "Mixing session started: quantity {}, {} seeds, seed {}",
            quantity,
            state.particles.len(),
            seed
        );
        self.session = Some(state);
        self.finished = None;
        self.play(Cue::PourStart);
    }

    /// Advance the live session by one frame; no-op without a session
    pub fn step(&mut self, pointer: &PointerSample) {
        let Some(state) = self.session.as_mut() else {
            return;
        };
        tick(state, pointer, &self.tuning);

        for event in state.drain_events() {
            match event {
                MixEvent::Cue(cue) => {
                    if let Some(player) = self.cues.as_mut() {
                        player.play(cue);
                    }
                }
                MixEvent::StopCues => {
                    if let Some(player) = self.cues.as_mut() {
                        player.stop_all();
                    }
                }
                MixEvent::TutorialSeen => {
                    self.tutorial_seen = true;
                    log::info!("Knead tutorial dismissed");
                }
                MixEvent::PhaseChanged { from, to } => {
                    log::debug!("Mixing phase {:?} -> {:?}", from, to);
                    if to == MixPhase::TimeUp {
                        log::info!("Mixing time up at {:.1}% progress", state.progress);
                    }
                }
            }
        }
    }

    /// Snapshot for the presentation layer
    pub fn render_state(&self) -> Option<RenderState> {
        self.session
            .as_ref()
            .map(|state| RenderState::capture(state, &self.tuning))
    }

    pub fn phase(&self) -> Option<MixPhase> {
        self.session.as_ref().map(|s| s.phase)
    }

    /// Score and discard the live session.
    ///
    /// Calling again returns the same score without touching anything.
    /// Returns `None` if no session was ever started (or it was cancelled).
    pub fn end(&mut self) -> Option<MixScore> {
        if let Some(state) = self.session.take() {
            let score = MixScore::from_progress(state.progress, &self.tuning);
            log::info!(
                "Mixing session ended: progress {:.1}%, score {}",
                state.progress,
                score.score
            );
            self.finished = Some(score);
        }
        self.finished
    }

    /// Abort the live session without a score
    pub fn cancel(&mut self) {
        if let Some(state) = self.session.take() {
            log::info!("Mixing session cancelled at {:?}", state.phase);
            if let Some(player) = self.cues.as_mut() {
                player.stop_all();
            }
        }
        self.finished = None;
    }

    fn play(&mut self, cue: Cue) {
        if let Some(player) = self.cues.as_mut() {
            player.play(cue);
        }
    }
}

impl std::fmt::Debug for MixGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixGame")
            .field("next_seed", &self.next_seed)
            .field("phase", &self.phase())
            .field("finished", &self.finished)
            .field("tutorial_seen", &self.tutorial_seen)
            .field("has_cue_player", &self.cues.is_some())
            .finish()
    }
}
