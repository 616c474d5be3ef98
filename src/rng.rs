//! Randomness seam for wager games.
//!
//! Every probabilistic draw a game makes goes through [`WagerRng`], so game
//! logic is deterministic given its draws. Production uses [`StdWagerRng`];
//! tests script exact outcomes with [`ScriptedRng`].

use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source of the random draws games make.
pub trait WagerRng: Send + Sync {
    /// Bernoulli draw: true with probability `p` (clamped to `[0, 1]`).
    fn chance(&self, p: f64) -> bool;

    /// Uniform draw from `[min, max]`.
    fn fraction(&self, min: f64, max: f64) -> f64;

    /// Uniform integer draw from `[min, max]` inclusive.
    fn amount(&self, min: i64, max: i64) -> i64;

    /// Uniform index draw from `0..len`. `len` must be non-zero.
    fn index(&self, len: usize) -> usize;
}

/// Thread-local OS-seeded randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdWagerRng;

impl WagerRng for StdWagerRng {
    fn chance(&self, p: f64) -> bool {
        rand::rng().random_bool(p.clamp(0.0, 1.0))
    }

    fn fraction(&self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        rand::rng().random_range(min..=max)
    }

    fn amount(&self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        rand::rng().random_range(min..=max)
    }

    fn index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len.max(1))
    }
}

/// A pre-scripted draw for [`ScriptedRng`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Draw {
    Chance(bool),
    Fraction(f64),
    Amount(i64),
    Index(usize),
}

/// Deterministic rng that replays a queued script of draws.
///
/// Each call pops the front of the queue and returns its value when the
/// variant matches the call. A mismatched or exhausted script falls back to
/// a fixed deterministic value (false, `min`, `min`, 0) so game logic never
/// sees a surprise; assert on balances, not on the script running dry.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    script: Mutex<VecDeque<Draw>>,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = Draw>) -> Self {
        Self {
            script: Mutex::new(draws.into_iter().collect()),
        }
    }

    pub fn push(&self, draw: Draw) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(draw);
        }
    }

    fn pop(&self) -> Option<Draw> {
        self.script.lock().ok()?.pop_front()
    }
}

impl WagerRng for ScriptedRng {
    fn chance(&self, _p: f64) -> bool {
        match self.pop() {
            Some(Draw::Chance(value)) => value,
            _ => false,
        }
    }

    fn fraction(&self, min: f64, _max: f64) -> f64 {
        match self.pop() {
            Some(Draw::Fraction(value)) => value,
            _ => min,
        }
    }

    fn amount(&self, min: i64, _max: i64) -> i64 {
        match self.pop() {
            Some(Draw::Amount(value)) => value,
            _ => min,
        }
    }

    fn index(&self, _len: usize) -> usize {
        match self.pop() {
            Some(Draw::Index(value)) => value,
            _ => 0,
        }
    }
}
