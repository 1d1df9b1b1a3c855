//! Progressive reveal of the correct token after repeated mistakes.
//!
//! Positions are character indices or word indices depending on how the
//! tracker is fed (`observe_chars` / `observe_words`). Each position moves
//! `unseen → mistaken(n) → revealed`; a revealed position stays revealed
//! until the tracker is reset for the next challenge.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::matcher::chars_eq_ignore_case;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HintPolicy {
    /// At most one reveal per challenge.
    Single,
    /// A new reveal only once the cursor is past every earlier reveal.
    Progressive { max_reveals: usize },
    /// Word positions; an incomplete current word is revealed when all prior
    /// words are right and the learner already went wrong there once.
    WordLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealThreshold {
    Fixed { count: u32 },
    Random { min: u32, max: u32 },
}

impl RevealThreshold {
    /// Mistakes needed for a reveal; random thresholds are drawn once per challenge.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        match *self {
            RevealThreshold::Fixed { count } => count.max(1),
            RevealThreshold::Random { min, max } => {
                let (lo, hi) = (min.min(max), min.max(max));
                rng.gen_range(lo..=hi).max(1)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionState {
    Unseen,
    Mistaken(u32),
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintUpdate {
    /// Same wrong value as last time at this position.
    Repeat,
    Counted(u32),
    Revealed,
    /// Already revealed and still wrong.
    Shake,
}

#[derive(Clone, Debug)]
pub struct HintTracker {
    policy: HintPolicy,
    threshold: u32,
    mistakes: BTreeMap<usize, u32>,
    last_wrong: HashMap<usize, String>,
    /// Positions found wrong by the previous and the current observation.
    wrong_before: BTreeSet<usize>,
    wrong_now: BTreeSet<usize>,
    revealed: BTreeSet<usize>,
    shaking: Option<usize>,
}

impl HintTracker {
    pub fn new(policy: HintPolicy, threshold: u32) -> Self {
        Self {
            policy,
            threshold: threshold.max(1),
            mistakes: BTreeMap::new(),
            last_wrong: HashMap::new(),
            wrong_before: BTreeSet::new(),
            wrong_now: BTreeSet::new(),
            revealed: BTreeSet::new(),
            shaking: None,
        }
    }

    /// Clears everything for the next challenge.
    pub fn reset(&mut self, threshold: u32) {
        self.threshold = threshold.max(1);
        self.mistakes.clear();
        self.last_wrong.clear();
        self.wrong_before.clear();
        self.wrong_now.clear();
        self.revealed.clear();
        self.shaking = None;
    }

    pub fn policy(&self) -> HintPolicy {
        self.policy
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn state(&self, pos: usize) -> PositionState {
        if self.revealed.contains(&pos) {
            PositionState::Revealed
        } else {
            match self.mistakes.get(&pos) {
                Some(&n) if n > 0 => PositionState::Mistaken(n),
                _ => PositionState::Unseen,
            }
        }
    }

    pub fn mistakes_at(&self, pos: usize) -> u32 {
        self.mistakes.get(&pos).copied().unwrap_or(0)
    }

    pub fn total_mistakes(&self) -> u32 {
        self.mistakes.values().sum()
    }

    pub fn is_revealed(&self, pos: usize) -> bool {
        self.revealed.contains(&pos)
    }

    pub fn revealed(&self) -> impl Iterator<Item = usize> + '_ {
        self.revealed.iter().copied()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn shaking(&self) -> Option<usize> {
        self.shaking
    }

    pub fn clear_shake(&mut self) {
        self.shaking = None;
    }

    fn may_reveal(&self, cursor: usize) -> bool {
        match self.policy {
            HintPolicy::Single => self.revealed.is_empty(),
            HintPolicy::Progressive { max_reveals } => {
                self.revealed.len() < max_reveals && self.revealed.iter().all(|&p| p < cursor)
            }
            HintPolicy::WordLevel => true,
        }
    }

    fn begin_observation(&mut self) {
        self.wrong_before = std::mem::take(&mut self.wrong_now);
    }

    /// Records a wrong `value` at `pos`. `cursor` is where the learner is
    /// typing now, in the same unit as `pos`.
    ///
    /// A revealed position pulses whenever it turns wrong again, even with
    /// the same value; it stays quiet while it remains wrong across inputs.
    pub fn record_mistake(&mut self, pos: usize, value: &str, cursor: usize) -> HintUpdate {
        let repeat = self.last_wrong.get(&pos).is_some_and(|last| last == value);
        let still_wrong = self.wrong_before.contains(&pos);
        self.wrong_now.insert(pos);

        if self.revealed.contains(&pos) {
            if repeat && still_wrong {
                return HintUpdate::Repeat;
            }
            self.last_wrong.insert(pos, value.to_string());
            self.shaking = Some(pos);
            return HintUpdate::Shake;
        }

        if repeat {
            return HintUpdate::Repeat;
        }
        self.last_wrong.insert(pos, value.to_string());

        let count = self.mistakes.entry(pos).or_insert(0);
        *count += 1;
        let count = *count;
        if count >= self.threshold && self.may_reveal(cursor) {
            self.revealed.insert(pos);
            HintUpdate::Revealed
        } else {
            HintUpdate::Counted(count)
        }
    }

    fn force_reveal(&mut self, pos: usize) -> bool {
        self.revealed.insert(pos)
    }
}

/// Character-position observation. Only positions inside `reference` are
/// tracked; surplus input has no correct character to reveal.
pub fn observe_chars(
    tracker: &mut HintTracker,
    input: &str,
    reference: &str,
    fold_case: bool,
) -> Vec<HintUpdate> {
    tracker.begin_observation();
    let cursor = input.chars().count();
    input
        .chars()
        .zip(reference.chars())
        .enumerate()
        .filter(|&(_, (typed, expected))| {
            if fold_case {
                !chars_eq_ignore_case(typed, expected)
            } else {
                typed != expected
            }
        })
        .map(|(i, (typed, _))| tracker.record_mistake(i, typed.encode_utf8(&mut [0; 4]), cursor))
        .collect()
}

/// Word-position observation against space-separated `reference` words.
pub fn observe_words(
    tracker: &mut HintTracker,
    input: &str,
    reference: &str,
    fold_case: bool,
) -> Vec<HintUpdate> {
    let eq = |a: &str, b: &str| {
        if fold_case {
            a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    };
    let is_prefix = |word: &str, of: &str| {
        if fold_case {
            of.to_lowercase().starts_with(&word.to_lowercase())
        } else {
            of.starts_with(word)
        }
    };

    tracker.begin_observation();
    let typed: Vec<&str> = input.split(' ').collect();
    let expected: Vec<&str> = reference.split(' ').collect();
    let current = typed.len() - 1;
    let mut updates = Vec::new();
    let mut prior_correct = true;

    for (i, &word) in typed.iter().enumerate() {
        let target = expected.get(i).copied();
        if i < current {
            if target.is_some_and(|t| eq(word, t)) {
                continue;
            }
            prior_correct = false;
            updates.push(tracker.record_mistake(i, word, current));
            continue;
        }

        // The word still being typed.
        if word.is_empty() {
            break;
        }
        match target {
            Some(t) if is_prefix(word, t) => {
                let incomplete = !eq(word, t);
                if tracker.policy() == HintPolicy::WordLevel
                    && incomplete
                    && prior_correct
                    && tracker.mistakes_at(i) > 0
                    && tracker.force_reveal(i)
                {
                    updates.push(HintUpdate::Revealed);
                }
            }
            _ => updates.push(tracker.record_mistake(i, word, current)),
        }
    }
    updates
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_reveal_after_two_distinct_mistakes() {
        let mut tracker = HintTracker::new(HintPolicy::Progressive { max_reveals: 5 }, 2);
        observe_chars(&mut tracker, "x", "Ich", false);
        assert_eq!(tracker.state(0), PositionState::Mistaken(1));
        observe_chars(&mut tracker, "y", "Ich", false);
        assert_eq!(tracker.state(0), PositionState::Revealed);

        // Correct char typed elsewhere; position 0 stays revealed.
        observe_chars(&mut tracker, "yc", "Ich", false);
        observe_chars(&mut tracker, "Ic", "Ich", false);
        assert!(tracker.is_revealed(0));
    }

    #[test]
    fn test_unchanged_repeat_not_double_counted() {
        let mut tracker = HintTracker::new(HintPolicy::Single, 2);
        observe_chars(&mut tracker, "x", "abc", false);
        observe_chars(&mut tracker, "xb", "abc", false);
        observe_chars(&mut tracker, "xbc", "abc", false);
        assert_eq!(tracker.mistakes_at(0), 1);
        assert!(!tracker.is_revealed(0));
    }

    #[test]
    fn test_single_policy_reveals_once() {
        let mut tracker = HintTracker::new(HintPolicy::Single, 1);
        assert_eq!(tracker.record_mistake(0, "x", 1), HintUpdate::Revealed);
        assert_eq!(tracker.record_mistake(3, "x", 4), HintUpdate::Counted(1));
        assert_eq!(tracker.revealed_count(), 1);
    }

    #[test]
    fn test_progressive_waits_for_cursor_and_caps() {
        let mut tracker = HintTracker::new(HintPolicy::Progressive { max_reveals: 2 }, 1);
        assert_eq!(tracker.record_mistake(4, "x", 5), HintUpdate::Revealed);
        // Cursor not past position 4 yet.
        assert_eq!(tracker.record_mistake(2, "x", 3), HintUpdate::Counted(1));
        assert_eq!(tracker.record_mistake(6, "x", 7), HintUpdate::Revealed);
        // Cap reached.
        assert_eq!(tracker.record_mistake(9, "x", 10), HintUpdate::Counted(1));
        assert_eq!(tracker.revealed().collect::<Vec<_>>(), vec![4, 6]);
    }

    #[test]
    fn test_shake_on_revealed_still_wrong() {
        let mut tracker = HintTracker::new(HintPolicy::WordLevel, 1);
        tracker.record_mistake(0, "a", 1);
        assert_eq!(tracker.record_mistake(0, "b", 1), HintUpdate::Shake);
        assert_eq!(tracker.shaking(), Some(0));
        tracker.clear_shake();
        assert_eq!(tracker.shaking(), None);
        assert!(tracker.is_revealed(0));
    }

    #[test]
    fn test_shake_when_same_wrong_char_is_retyped() {
        let mut tracker = HintTracker::new(HintPolicy::Progressive { max_reveals: 5 }, 2);
        observe_chars(&mut tracker, "x", "Ich", false);
        observe_chars(&mut tracker, "", "Ich", false);
        observe_chars(&mut tracker, "y", "Ich", false);
        assert!(tracker.is_revealed(0));
        tracker.clear_shake();

        observe_chars(&mut tracker, "", "Ich", false);
        let updates = observe_chars(&mut tracker, "y", "Ich", false);
        assert_eq!(updates, vec![HintUpdate::Shake]);
        assert_eq!(tracker.shaking(), Some(0));

        // Typing on past the wrong char does not pulse again.
        tracker.clear_shake();
        observe_chars(&mut tracker, "yy", "Ich", false);
        assert_eq!(tracker.shaking(), None);
        assert_eq!(tracker.mistakes_at(0), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tracker = HintTracker::new(HintPolicy::Single, 1);
        tracker.record_mistake(0, "a", 1);
        tracker.reset(3);
        assert_eq!(tracker.revealed_count(), 0);
        assert_eq!(tracker.state(0), PositionState::Unseen);
        assert_eq!(tracker.threshold(), 3);
    }

    #[test]
    fn test_builder_chars_fold_case_and_ignore_surplus() {
        let mut tracker = HintTracker::new(HintPolicy::Single, 1);
        let updates = observe_chars(&mut tracker, "dER Hundxyz", "Der Hund", true);
        assert!(updates.is_empty());
    }

    #[test]
    fn test_words_count_confirmed_wrong_word() {
        let target = "Ich trinke Kaffee am Morgen";
        let mut tracker = HintTracker::new(HintPolicy::Progressive { max_reveals: 5 }, 2);
        observe_words(&mut tracker, "Ich trinkt ", target, false);
        assert_eq!(tracker.mistakes_at(1), 1);
        observe_words(&mut tracker, "Ich trinkt K", target, false);
        assert_eq!(tracker.mistakes_at(1), 1);
        observe_words(&mut tracker, "Ich trinken ", target, false);
        assert!(tracker.is_revealed(1));
    }

    #[test]
    fn test_words_wrong_prefix_counts() {
        let mut tracker = HintTracker::new(HintPolicy::WordLevel, 4);
        observe_words(&mut tracker, "Ich bim", "Ich bin müde", false);
        assert_eq!(tracker.mistakes_at(1), 1);
    }

    #[test]
    fn test_word_level_reveals_incomplete_after_prior_mistake() {
        let target = "Das Haus ist groß";
        let mut tracker = HintTracker::new(HintPolicy::WordLevel, 4);
        observe_words(&mut tracker, "Das Hx", target, false);
        assert_eq!(tracker.mistakes_at(1), 1);
        assert!(!tracker.is_revealed(1));
        // Backed off to a valid but incomplete prefix.
        observe_words(&mut tracker, "Das H", target, false);
        assert!(tracker.is_revealed(1));
    }

    #[test]
    fn test_word_level_needs_prior_words_correct() {
        let target = "Das Haus ist groß";
        let mut tracker = HintTracker::new(HintPolicy::WordLevel, 4);
        observe_words(&mut tracker, "Dos ist", target, false);
        observe_words(&mut tracker, "Dos Hx", target, false);
        observe_words(&mut tracker, "Dos H", target, false);
        assert!(!tracker.is_revealed(1));
    }

    #[test]
    fn test_random_threshold_within_range() {
        let mut rng = SmallRng::seed_from_u64(9);
        let threshold = RevealThreshold::Random { min: 3, max: 7 };
        for _ in 0..100 {
            let n = threshold.roll(&mut rng);
            assert!((3..=7).contains(&n));
        }
        assert_eq!(RevealThreshold::Fixed { count: 0 }.roll(&mut rng), 1);
        let swapped = RevealThreshold::Random { min: 5, max: 2 };
        assert!((2..=5).contains(&swapped.roll(&mut rng)));
    }
}
