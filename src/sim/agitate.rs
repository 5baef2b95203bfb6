//! Pointer agitation: turns drags into kneading
//!
//! Dragging inside the bowl shoves nearby seeds along the drag direction,
//! accumulates drag distance (which drives progress) and paces the stirring
//! and kneading sound cues.

use glam::Vec2;
use rand::Rng;

use super::particle::Particle;
use super::state::{MixPhase, MixState, PointerSample};
use crate::consts::{KNEAD_ANIM_FRAMES, KNEAD_ANIM_TICKS};
use crate::cues::Cue;
use crate::tuning::MixTuning;

/// Progress at which stirring turns into kneading
pub const KNEAD_PROGRESS: f32 = 50.0;

/// Shove seeds near `pointer` along `movement`.
///
/// The shove falls off linearly from full strength at the pointer to zero at
/// `agitate_radius`. Each shoved seed also gets per-axis jitter so the seeds
/// do not move in lockstep. Returns the number of seeds touched.
pub fn shove_particles<R: Rng>(
    particles: &mut [Particle],
    pointer: Vec2,
    movement: Vec2,
    rng: &mut R,
    tuning: &MixTuning,
) -> usize {
    let radius = tuning.agitate_radius;
    if radius <= 0.0 {
        return 0;
    }

    let mut touched = 0;
    for p in particles.iter_mut() {
        let dist = pointer.distance(p.pos);
        if dist < radius {
            let falloff = 1.0 - dist / radius;
            let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5)
                * tuning.agitate_jitter;
            p.vel += movement * falloff * tuning.agitate_strength + jitter;
            touched += 1;
        }
    }
    touched
}

/// Consume one frame of pointer input during the live mixing phase
pub fn agitate(state: &mut MixState, input: &PointerSample, tuning: &MixTuning) {
    let movement = input.pos - state.last_pointer;
    state.last_pointer = input.pos;

    // Cooldowns tick regardless of input
    state.mix_cue_cooldown = state.mix_cue_cooldown.saturating_sub(1);
    state.knead_cue_cooldown = state.knead_cue_cooldown.saturating_sub(1);

    if !input.pressed {
        return;
    }

    advance_knead_animation(state);

    if input.pos.distance(tuning.bowl_center) >= tuning.activation_radius() {
        return;
    }

    let moved = movement.length();
    state.drag_distance += moved;
    if state.progress < 100.0 {
        state.progress = tuning.progress_for(state.drag_distance).max(state.progress);
    }

    // The clock may have just run out this frame; time-up stays silent
    if moved > tuning.cue_min_move && state.phase != MixPhase::TimeUp {
        if state.progress > 0.0 && state.progress < KNEAD_PROGRESS {
            if state.mix_cue_cooldown == 0 {
                state.cue(Cue::Mix);
                state.mix_cue_cooldown = tuning.mix_cue_cooldown;
            }
        } else if state.progress >= KNEAD_PROGRESS && state.knead_cue_cooldown == 0 {
            state.cue(Cue::Knead);
            state.knead_cue_cooldown = tuning.knead_cue_cooldown;
        }
    }

    let touched = shove_particles(
        &mut state.particles,
        input.pos,
        movement,
        &mut state.rng,
        tuning,
    );
    log::trace!(
        "agitate: moved {:.1}px, {} seeds, progress {:.1}",
        moved,
        touched,
        state.progress
    );
}

fn advance_knead_animation(state: &mut MixState) {
    state.knead_anim_ticks += 1;
    if state.knead_anim_ticks >= KNEAD_ANIM_TICKS {
        state.knead_anim_ticks = 0;
        state.knead_frame = (state.knead_frame + 1) % KNEAD_ANIM_FRAMES;
    }
}
