use crate::content::Difficulty;
use crate::engine::metrics::Stats;

pub fn points_for_solve(difficulty: Difficulty) -> u32 {
    let tier = difficulty.tier();
    50 * tier + 25 * tier
}

pub fn apply_skip_penalty(score: u32, penalty: u32) -> u32 {
    score.saturating_sub(penalty)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuggestionRule {
    pub min_completed: usize,
    pub min_accuracy: u32,
    pub min_wpm: u32,
}

impl Default for SuggestionRule {
    fn default() -> Self {
        Self {
            min_completed: 5,
            min_accuracy: 95,
            min_wpm: 30,
        }
    }
}

/// Non-binding recommendation for the next session's tier.
pub fn suggest_difficulty(
    current: Difficulty,
    completed: usize,
    stats: Stats,
    rule: &SuggestionRule,
) -> Option<Difficulty> {
    let qualifies = completed >= rule.min_completed
        && stats.accuracy >= rule.min_accuracy
        && stats.wpm >= rule.min_wpm;
    qualifies.then(|| current.harder())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(wpm: u32, accuracy: u32) -> Stats {
        Stats { wpm, accuracy }
    }

    #[test]
    fn test_points_scale_with_tier() {
        assert_eq!(points_for_solve(Difficulty::Beginner), 75);
        assert_eq!(points_for_solve(Difficulty::Intermediate), 150);
        assert_eq!(points_for_solve(Difficulty::Advanced), 225);
    }

    #[test]
    fn test_skip_penalty_saturates() {
        assert_eq!(apply_skip_penalty(25, 10), 15);
        assert_eq!(apply_skip_penalty(5, 10), 0);
    }

    #[test]
    fn test_suggestion_requires_all_thresholds() {
        let rule = SuggestionRule::default();
        let b = Difficulty::Beginner;
        assert_eq!(
            suggest_difficulty(b, 5, stats(30, 95), &rule),
            Some(Difficulty::Intermediate)
        );
        assert_eq!(suggest_difficulty(b, 4, stats(60, 100), &rule), None);
        assert_eq!(suggest_difficulty(b, 8, stats(29, 100), &rule), None);
        assert_eq!(suggest_difficulty(b, 8, stats(60, 94), &rule), None);
    }

    #[test]
    fn test_suggestion_caps_at_advanced() {
        let rule = SuggestionRule::default();
        assert_eq!(
            suggest_difficulty(Difficulty::Advanced, 9, stats(80, 100), &rule),
            Some(Difficulty::Advanced)
        );
    }
}
