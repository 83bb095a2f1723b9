//! Randomness source for the engine.
//!
//! Every random draw in the game goes through [`Dice`] so a session can run on
//! a seeded `StdRng` in play and on [`ScriptedDice`] in tests.

use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

pub trait Dice {
    /// Uniform integer in `low..=high`. Returns `low` when the range is empty.
    fn roll(&mut self, low: i32, high: i32) -> i32;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool;

    /// Index in `0..len`. Returns 0 for an empty range.
    fn pick(&mut self, len: usize) -> usize;
}

fn roll_with<R: Rng>(rng: &mut R, low: i32, high: i32) -> i32 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..=high)
}

fn chance_with<R: Rng>(rng: &mut R, p: f64) -> bool {
    if p <= 0.0 {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.gen_bool(p)
    }
}

fn pick_with<R: Rng>(rng: &mut R, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        rng.gen_range(0..len)
    }
}

impl Dice for StdRng {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        roll_with(self, low, high)
    }

    fn chance(&mut self, p: f64) -> bool {
        chance_with(self, p)
    }

    fn pick(&mut self, len: usize) -> usize {
        pick_with(self, len)
    }
}

/// Replays queued outcomes in order.
///
/// Rolls are clamped into the requested range. An exhausted queue falls back to
/// the lowest roll, a failed chance and index 0. Chances of 0 or 1 are decided
/// without consuming the queue.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
    chances: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = i32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn push_rolls(&mut self, rolls: impl IntoIterator<Item = i32>) {
        self.rolls.extend(rolls);
    }

    pub fn push_chances(&mut self, chances: impl IntoIterator<Item = bool>) {
        self.chances.extend(chances);
    }

    pub fn push_picks(&mut self, picks: impl IntoIterator<Item = usize>) {
        self.picks.extend(picks);
    }

    /// Outcomes not yet consumed, as (rolls, chances, picks).
    pub fn pending(&self) -> (usize, usize, usize) {
        (self.rolls.len(), self.chances.len(), self.picks.len())
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        let high = high.max(low);
        match self.rolls.pop_front() {
            Some(v) => v.clamp(low, high),
            None => low,
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.chances.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.picks.pop_front().unwrap_or(0).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn seeded_rng_is_repeatable_and_in_range() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let x = a.roll(3, 8);
            assert_eq!(x, b.roll(3, 8));
            assert!((3..=8).contains(&x));
        }
        assert_eq!(a.roll(5, 5), 5);
        assert_eq!(a.pick(0), 0);
        assert!(!a.chance(0.0));
        assert!(a.chance(1.0));
    }

    #[test]
    fn scripted_rolls_clamp_and_fall_back() {
        let mut d = ScriptedDice::new().with_rolls([50, -3, 4]);
        assert_eq!(d.roll(1, 20), 20);
        assert_eq!(d.roll(1, 20), 1);
        assert_eq!(d.roll(1, 20), 4);
        assert_eq!(d.roll(2, 6), 2);
    }

    #[test]
    fn scripted_certain_chances_do_not_consume() {
        let mut d = ScriptedDice::new().with_chances([true]);
        assert!(d.chance(1.0));
        assert!(!d.chance(0.0));
        assert_eq!(d.pending(), (0, 1, 0));
        assert!(d.chance(0.3));
        assert!(!d.chance(0.3));
    }

    #[test]
    fn scripted_picks_stay_in_bounds() {
        let mut d = ScriptedDice::new().with_picks([9, 1]);
        assert_eq!(d.pick(3), 2);
        assert_eq!(d.pick(3), 1);
        assert_eq!(d.pick(3), 0);
    }
}
