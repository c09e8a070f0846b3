//! Difficulty scaler
//!
//! One level per 10 seconds of unpaused play time. Only ever goes up within a
//! run; `reset` starts a new run at zero.

use serde::{Deserialize, Serialize};

use crate::consts::DIFFICULTY_PERIOD_MS;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    level: u32,
    /// Play time accumulated toward the next level (ms)
    carry_ms: u64,
}

impl Difficulty {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Feed elapsed play time; returns how many levels were gained
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        self.carry_ms += elapsed_ms;
        let gained = (self.carry_ms / DIFFICULTY_PERIOD_MS) as u32;
        self.carry_ms %= DIFFICULTY_PERIOD_MS;
        self.level += gained;
        gained
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
