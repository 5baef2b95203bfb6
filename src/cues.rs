//! Sound cue vocabulary
//!
//! The simulation only names cues; a host-provided [`CuePlayer`] turns them
//! into sound. Sessions without a player simply stay silent.

use serde::{Deserialize, Serialize};

/// Sound cues raised by the mixing minigame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Pour started (confirm tone)
    PourStart,
    /// A falling seed bounced on the bowl floor
    Bounce,
    /// Tutorial overlay dismissed
    TutorialDismissed,
    /// Mixing timer ran out
    TimeUp,
    /// Loose seeds being stirred (progress below 50%)
    Mix,
    /// Dough being kneaded (progress 50% and above)
    Knead,
    /// Quantity dial rolled one step; digit 0 is the hundreds place
    DialTick { digit: u8 },
    /// Tried to start with nothing selected
    Rejected,
}

/// Fire-and-forget sound output
pub trait CuePlayer {
    /// Play a cue; failures are swallowed by the implementation
    fn play(&mut self, cue: Cue);

    /// Stop every looping or still-ringing cue
    fn stop_all(&mut self) {}
}

/// Player that records cues instead of playing them
#[derive(Debug, Default, Clone)]
pub struct CueLog {
    pub played: Vec<Cue>,
    pub stops: u32,
}

impl CuePlayer for CueLog {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }

    fn stop_all(&mut self) {
        self.stops += 1;
    }
}

impl<T: CuePlayer + ?Sized> CuePlayer for std::rc::Rc<std::cell::RefCell<T>> {
    fn play(&mut self, cue: Cue) {
        self.borrow_mut().play(cue);
    }

    fn stop_all(&mut self) {
        self.borrow_mut().stop_all();
    }
}
