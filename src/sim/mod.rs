//! Deterministic mixing simulation
//!
//! All minigame logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call = one frame)
//! - Seeded RNG only
//! - Stable iteration order (particle index)
//! - No rendering, audio or platform dependencies; side effects leave as events

pub mod agitate;
pub mod collision;
pub mod integrate;
pub mod particle;
pub mod state;
pub mod tick;
pub mod view;

pub use agitate::{agitate, shove_particles};
pub use collision::{Contact, circle_contact, resolve_collisions};
pub use integrate::{contain, integrate_mix, integrate_pour, update_settled};
pub use particle::{Particle, spawn_particles};
pub use state::{MixEvent, MixPhase, MixState, PointerSample};
pub use tick::tick;
pub use view::{DoughStage, MixMessage, ParticleView, RenderState, SeedInstance};
