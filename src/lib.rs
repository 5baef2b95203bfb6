//! Star Mixer - the "make dough" minigame core
//!
//! Core modules:
//! - `sim`: Deterministic frame-stepped bowl simulation (particles, collisions, phases)
//! - `session`: Owned mixing session with injected host ports
//! - `tuning`: Data-driven mixing balance
//! - `selector`: Three-digit quantity dial
//! - `cues`: Sound cue vocabulary and the optional player port
//! - `settings`: Persisted player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod cues;
pub mod selector;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use cues::{Cue, CuePlayer};
pub use selector::QuantitySelector;
pub use session::{MixGame, MixScore};
pub use settings::Settings;
pub use tuning::MixTuning;

/// Frame and session structure constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Requested quantities above this still pour only this many units
    pub const MAX_VISUAL_QUANTITY: u32 = 30;
    /// Particles spawned per requested unit
    pub const PARTICLES_PER_UNIT: u32 = 5;

    /// Frames spent pouring and settling before mixing begins
    pub const POUR_TICKS: u32 = 120;
    /// Frames of "start!" animation before the mixing timer runs
    pub const WARMUP_TICKS: u32 = 60;

    /// Knead animation has this many frames
    pub const KNEAD_ANIM_FRAMES: u8 = 8;
    /// Ticks of held pointer per knead animation frame
    pub const KNEAD_ANIM_TICKS: u32 = 8;

    /// Highest score a perfectly mixed dough can earn
    pub const MAX_SCORE: u32 = 30;
}

/// Number of particles poured for a requested quantity
#[inline]
pub fn particle_count(quantity: u32) -> usize {
    (quantity.min(consts::MAX_VISUAL_QUANTITY) * consts::PARTICLES_PER_UNIT) as usize
}
