use serde::{Deserialize, Serialize};

use crate::content::{Difficulty, Mode};
use crate::engine::metrics::Stats;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub stats: Stats,
    pub completed: usize,
    pub skipped: usize,
    pub total: usize,
    pub score: u32,
    pub failed_submits: u32,
    pub active_secs: u64,
    /// Recommendation only; the learner's selection is never changed.
    pub suggested: Option<Difficulty>,
}

impl SessionSummary {
    pub fn verdict(&self) -> &'static str {
        if self.stats.accuracy >= 95 {
            "Perfekt! Perfect German!"
        } else if self.stats.accuracy >= 85 {
            "Sehr gut! Very good work!"
        } else {
            "Gut gemacht! Keep practicing!"
        }
    }

    pub fn level(&self) -> u32 {
        self.difficulty.tier()
    }
}
