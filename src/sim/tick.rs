//! Fixed timestep simulation tick
//!
//! Advances a mixing session by exactly one frame. There is no variable-delta
//! accumulation: one call is one display frame.

use super::agitate::agitate;
use super::collision::resolve_collisions;
use super::integrate::{contain, integrate_mix, integrate_pour, update_settled};
use super::state::{MixEvent, MixPhase, MixState, PointerSample};
use crate::consts::*;
use crate::cues::Cue;
use crate::tuning::MixTuning;

/// Advance the session by one frame
pub fn tick(state: &mut MixState, input: &PointerSample, tuning: &MixTuning) {
    state.time_ticks += 1;

    match state.phase {
        MixPhase::Pouring | MixPhase::Settling => tick_pour(state, tuning),
        MixPhase::Mixing => tick_mix(state, input, tuning),
        // Frozen for the result screen
        MixPhase::TimeUp => {}
    }
}

fn tick_pour(state: &mut MixState, tuning: &MixTuning) {
    let bounces = integrate_pour(&mut state.particles, tuning);
    if bounces > 0 {
        state.cue(Cue::Bounce);
    }
    resolve_collisions(&mut state.particles, tuning.collision_impulse);
    update_settled(&mut state.particles, tuning.settle_speed);

    state.pour_ticks += 1;

    if state.phase == MixPhase::Pouring && state.all_landed() {
        state.set_phase(MixPhase::Settling);
    }

    if state.pour_ticks >= POUR_TICKS {
        enter_mixing(state);
    }
}

/// Pour is over: every seed joins the dough, airborne or not
fn enter_mixing(state: &mut MixState) {
    for p in &mut state.particles {
        p.landed = true;
    }
    state.warmup_ticks = 0;
    state.mixing_started = false;
    state.set_phase(MixPhase::Mixing);
}

fn tick_mix(state: &mut MixState, input: &PointerSample, tuning: &MixTuning) {
    if state.show_tutorial {
        state.tutorial_ticks += 1;
        if input.just_pressed {
            state.show_tutorial = false;
            state.events.push(MixEvent::TutorialSeen);
            state.cue(Cue::TutorialDismissed);
        }
        return;
    }

    if !state.mixing_started {
        state.warmup_ticks += 1;
        if state.warmup_ticks >= WARMUP_TICKS {
            state.mixing_started = true;
        }
        state.last_pointer = input.pos;
        return;
    }

    state.time_left -= FRAME_DT;
    if state.time_left <= 0.0 {
        state.time_left = 0.0;
        state.set_phase(MixPhase::TimeUp);
        state.cue(Cue::TimeUp);
        state.events.push(MixEvent::StopCues);
    }

    // The frame the clock runs out still counts as a full mixing frame
    agitate(state, input, tuning);

    integrate_mix(&mut state.particles, tuning);
    resolve_collisions(&mut state.particles, tuning.collision_impulse);
    contain(&mut state.particles, tuning);
    update_settled(&mut state.particles, tuning.settle_speed);
}
