use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed-time floor for WPM, in minutes. Keeps the first seconds of typing
/// from producing huge spikes.
pub const MIN_MINUTES: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub wpm: u32,
    pub accuracy: u32,
}

pub fn word_count(input: &str) -> usize {
    input.split_whitespace().count()
}

/// Derives WPM and accuracy from the three inputs alone.
pub fn compute_stats(input: &str, active: Duration, errors: usize) -> Stats {
    stats_from_counts(word_count(input), input.chars().count(), active, errors)
}

/// Same as [`compute_stats`] for totals summed over several inputs.
pub fn stats_from_counts(words: usize, chars: usize, active: Duration, errors: usize) -> Stats {
    let minutes = (active.as_secs_f64() / 60.0).max(MIN_MINUTES);
    let wpm = (words as f64 / minutes).round().max(0.0);

    let total = chars;
    let accuracy = if total > 0 {
        ((total as f64 - errors as f64) / total as f64 * 100.0).round()
    } else {
        100.0
    };

    Stats {
        wpm: wpm as u32,
        accuracy: accuracy.clamp(0.0, 100.0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_full_accuracy() {
        for secs in [0, 1, 30, 600] {
            let stats = compute_stats("", Duration::from_secs(secs), 0);
            assert_eq!(stats.accuracy, 100);
            assert_eq!(stats.wpm, 0);
        }
    }

    #[test]
    fn test_floor_prevents_spikes() {
        // 2 words in 1 second would be 120 wpm without the floor.
        let stats = compute_stats("Ich bin", Duration::from_secs(1), 0);
        assert_eq!(stats.wpm, 20);
    }

    #[test]
    fn test_wpm_over_a_minute() {
        let stats = compute_stats("Das Haus ist groß", Duration::from_secs(60), 0);
        assert_eq!(stats.wpm, 4);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_words_split_on_any_whitespace() {
        assert_eq!(word_count("  Ich   bin\tmüde "), 3);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_accuracy_rounds() {
        // 18 chars, 1 error → 94.4 → 94
        let stats = compute_stats("Ich bin mude heute", Duration::from_secs(10), 1);
        assert_eq!(stats.accuracy, 94);
    }

    #[test]
    fn test_accuracy_counts_chars_not_bytes() {
        // "müde" is 4 chars, 5 bytes
        let stats = compute_stats("müde", Duration::from_secs(10), 1);
        assert_eq!(stats.accuracy, 75);
    }

    #[test]
    fn test_summed_counts_match_single_input() {
        let active = Duration::from_secs(30);
        assert_eq!(
            stats_from_counts(3, 12, active, 3),
            compute_stats("Ich bin müde", active, 3)
        );
        // Two inputs of 4 chars each, 2 errors: no separator in the denominator.
        assert_eq!(stats_from_counts(2, 8, active, 2).accuracy, 75);
    }

    #[test]
    fn test_never_negative() {
        let stats = compute_stats("ab", Duration::ZERO, 10);
        assert_eq!(stats.accuracy, 0);
        let inputs = ["", "a", "ein Buch", "x y z w"];
        for input in inputs {
            for errors in 0..12 {
                for ms in [0u64, 10, 5_000, 90_000] {
                    let s = compute_stats(input, Duration::from_millis(ms), errors);
                    assert!(s.accuracy <= 100);
                }
            }
        }
    }
}
