//! Three-digit quantity dial
//!
//! Before pouring, the player rolls each digit of the amount up or down.
//! The amount never exceeds the material the player owns.

use crate::cues::Cue;

/// Number of digit wheels (hundreds, tens, ones)
pub const DIGITS: usize = 3;

/// Rolling digit selector for the requested quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantitySelector {
    digits: [u8; DIGITS],
    max: u32,
}

impl QuantitySelector {
    /// A dial showing `initial`, limited to `max` (at most 999)
    pub fn new(initial: u32, max: u32) -> Self {
        let max = max.min(999);
        let mut selector = Self {
            digits: [0; DIGITS],
            max,
        };
        selector.set(initial);
        selector
    }

    pub fn value(&self) -> u32 {
        self.digits
            .iter()
            .fold(0, |acc, &d| acc * 10 + d as u32)
    }

    pub fn digits(&self) -> [u8; DIGITS] {
        self.digits
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Show `value`, clamped to the maximum
    pub fn set(&mut self, value: u32) {
        let value = value.min(self.max);
        self.digits = [
            (value / 100 % 10) as u8,
            (value / 10 % 10) as u8,
            (value % 10) as u8,
        ];
    }

    /// Change the owned maximum, clamping the shown value
    pub fn set_max(&mut self, max: u32) {
        self.max = max.min(999);
        self.set(self.value());
    }

    /// Roll one wheel a step; digits wrap 9 -> 0 and 0 -> 9.
    ///
    /// Returns the tick cue to play, or `None` for an out-of-range wheel.
    pub fn roll(&mut self, digit: usize, up: bool) -> Option<Cue> {
        let wheel = self.digits.get_mut(digit)?;
        *wheel = if up { (*wheel + 1) % 10 } else { (*wheel + 9) % 10 };

        if self.value() > self.max {
            self.set(self.max);
        }
        Some(Cue::DialTick { digit: digit as u8 })
    }

    /// Confirm the dial: the chosen quantity, or the rejection cue for zero
    pub fn confirm(&self) -> Result<u32, Cue> {
        match self.value() {
            0 => Err(Cue::Rejected),
            quantity => Ok(quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_digits_match_value() {
        let dial = QuantitySelector::new(207, 999);
        assert_eq!(dial.digits(), [2, 0, 7]);
        assert_eq!(dial.value(), 207);
    }

    #[test]
    fn test_initial_value_is_clamped() {
        let dial = QuantitySelector::new(500, 42);
        assert_eq!(dial.value(), 42);
    }

    #[test]
    fn test_roll_wraps() {
        let mut dial = QuantitySelector::new(9, 999);
        dial.roll(2, true);
        assert_eq!(dial.value(), 0);
        dial.roll(2, false);
        assert_eq!(dial.value(), 9);
    }

    #[test]
    fn test_roll_past_max_snaps_to_max() {
        let mut dial = QuantitySelector::new(15, 25);
        assert_eq!(dial.roll(1, true), Some(Cue::DialTick { digit: 1 }));
        assert_eq!(dial.value(), 25);
    }

    #[test]
    fn test_roll_invalid_wheel() {
        let mut dial = QuantitySelector::new(5, 10);
        assert_eq!(dial.roll(3, true), None);
        assert_eq!(dial.value(), 5);
    }

    #[test]
    fn test_confirm_rejects_zero() {
        assert_eq!(QuantitySelector::new(0, 10).confirm(), Err(Cue::Rejected));
        assert_eq!(QuantitySelector::new(7, 10).confirm(), Ok(7));
    }

    #[test]
    fn test_lowering_max_clamps() {
        let mut dial = QuantitySelector::new(80, 100);
        dial.set_max(30);
        assert_eq!(dial.value(), 30);
    }

    proptest! {
        #[test]
        fn prop_rolls_never_exceed_max(
            max in 0u32..1000,
            rolls in proptest::collection::vec((0usize..DIGITS, any::<bool>()), 0..50),
        ) {
            let mut dial = QuantitySelector::new(0, max);
            for (digit, up) in rolls {
                dial.roll(digit, up);
                prop_assert!(dial.value() <= dial.max());
            }
        }
    }
}
