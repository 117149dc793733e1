//! Step-budget reward

use serde::{Deserialize, Serialize};

/// Remaining step budget for an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccumulator {
    budget: u32,
    remaining: i64,
}

impl RewardAccumulator {
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            remaining: i64::from(budget),
        }
    }

    /// Refill to the configured budget
    pub fn reset(&mut self) {
        self.remaining = i64::from(self.budget);
    }

    /// Spend one step, whatever happened during it
    pub fn tick(&mut self) {
        self.remaining -= 1;
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.remaining
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }

    #[inline]
    pub fn budget(&self) -> u32 {
        self.budget
    }
}
