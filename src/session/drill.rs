use crate::content::{Answer, Challenge};
use crate::engine::matcher::{self, WordStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrillTarget {
    /// Typing mode: one exact string.
    Exact(String),
    /// Builder mode: any normalized match completes.
    AnyOf(Vec<Answer>),
}

/// Input state for the active challenge. Rebuilt on every advance.
#[derive(Clone, Debug)]
pub struct DrillState {
    pub target: DrillTarget,
    pub input: String,
    pub error_count: usize,
    pub best_match: Option<usize>,
    pub finished: bool,
    pub solved: bool,
    pub verdict: Option<bool>,
    pub failed_submits: u32,
}

impl DrillState {
    pub fn new(target: DrillTarget) -> Self {
        let best_match = match &target {
            DrillTarget::Exact(_) => None,
            DrillTarget::AnyOf(answers) => (!answers.is_empty()).then_some(0),
        };
        Self {
            target,
            input: String::new(),
            error_count: 0,
            best_match,
            finished: false,
            solved: false,
            verdict: None,
            failed_submits: 0,
        }
    }

    pub fn for_challenge(challenge: &Challenge) -> Self {
        match challenge {
            Challenge::Typing(text) => Self::new(DrillTarget::Exact(text.text.clone())),
            Challenge::Builder(builder) => Self::new(DrillTarget::AnyOf(builder.answers.clone())),
        }
    }

    pub fn is_builder(&self) -> bool {
        matches!(self.target, DrillTarget::AnyOf(_))
    }

    /// The string live feedback compares against: the typing text, or the
    /// current best-matching answer. Empty for a challenge with no answers.
    pub fn reference(&self) -> &str {
        match &self.target {
            DrillTarget::Exact(text) => text,
            DrillTarget::AnyOf(answers) => self
                .best_match
                .and_then(|i| answers.get(i))
                .map(|a| a.target.as_str())
                .unwrap_or(""),
        }
    }

    pub fn best_answer(&self) -> Option<&Answer> {
        match &self.target {
            DrillTarget::Exact(_) => None,
            DrillTarget::AnyOf(answers) => self.best_match.and_then(|i| answers.get(i)),
        }
    }

    pub fn is_complete(&self) -> bool {
        match &self.target {
            DrillTarget::Exact(text) => matcher::is_exact(&self.input, text),
            DrillTarget::AnyOf(answers) => {
                matcher::matches_any(&self.input, answers.iter().map(|a| a.target.as_str()))
            }
        }
    }

    /// Back to an empty attempt. `solved` survives so a challenge is only
    /// ever counted once.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.error_count = 0;
        self.finished = false;
        self.verdict = None;
        if let DrillTarget::AnyOf(answers) = &self.target {
            self.best_match = (!answers.is_empty()).then_some(0);
        }
    }

    pub fn word_statuses(&self) -> Vec<WordStatus> {
        matcher::word_statuses(&self.input, self.reference())
    }

    pub fn current_word(&self) -> usize {
        matcher::current_word_index(&self.input, self.reference())
    }

    pub fn char_feedback(&self) -> Vec<bool> {
        matcher::char_feedback(&self.input, self.reference())
    }

    pub fn progress(&self) -> f64 {
        let total = self.reference().chars().count();
        if total == 0 {
            return 0.0;
        }
        (self.input.chars().count() as f64 / total as f64).min(1.0)
    }
}
