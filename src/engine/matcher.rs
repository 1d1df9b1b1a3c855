//! Input comparison for both practice modes.
//!
//! Typing mode compares against one fixed target, positionally and
//! case-sensitively. Builder mode accepts any of several paraphrases: a
//! normalized exact match decides completion, and a longest-common-prefix
//! "best match" drives live per-character feedback.

use icu_normalizer::ComposingNormalizerBorrowed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordStatus {
    Pending,
    Current,
    Correct,
    Incorrect,
}

/// Count of positions where `input` differs from `target`. Characters past
/// the end of the target are all errors.
pub fn positional_errors(input: &str, target: &str) -> usize {
    let mut target_chars = target.chars();
    input
        .chars()
        .filter(|&ch| target_chars.next() != Some(ch))
        .count()
}

/// An empty target never completes.
pub fn is_exact(input: &str, target: &str) -> bool {
    !target.is_empty() && input == target
}

/// Index of the word being typed: the last space-separated token of the
/// input, clamped to the target's last word.
pub fn current_word_index(input: &str, target: &str) -> usize {
    let typed = input.split(' ').count();
    let words = target.split(' ').count();
    (typed - 1).min(words.saturating_sub(1))
}

/// Per-word highlight state for the target text.
pub fn word_statuses(input: &str, target: &str) -> Vec<WordStatus> {
    let typed: Vec<&str> = input.split(' ').collect();
    let current = current_word_index(input, target);
    target
        .split(' ')
        .enumerate()
        .map(|(i, word)| {
            if i == current {
                WordStatus::Current
            } else if i + 1 < typed.len() {
                if typed[i] == word {
                    WordStatus::Correct
                } else {
                    WordStatus::Incorrect
                }
            } else {
                WordStatus::Pending
            }
        })
        .collect()
}

/// NFC, trim, collapse whitespace runs, lowercase.
pub fn normalize_answer(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    let composed = nfc.normalize(text);
    composed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Answers that normalize to nothing are skipped, so a blank entry can never
/// be matched.
pub fn matches_any<'a, I>(input: &str, answers: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let normalized = normalize_answer(input);
    answers
        .into_iter()
        .map(normalize_answer)
        .filter(|answer| !answer.is_empty())
        .any(|answer| answer == normalized)
}

pub fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Length in chars of the case-insensitive common prefix.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|&(x, y)| chars_eq_ignore_case(x, y))
        .count()
}

/// Index of the candidate sharing the longest prefix with `input`. Ties go
/// to the earliest candidate; blank input selects the first. `None` only when
/// there are no candidates.
pub fn best_match<S: AsRef<str>>(input: &str, candidates: &[S]) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    if input.trim().is_empty() {
        return Some(0);
    }
    let mut best = 0;
    let mut best_len = 0;
    for (i, candidate) in candidates.iter().enumerate() {
        let len = common_prefix_len(input, candidate.as_ref());
        if len > best_len {
            best = i;
            best_len = len;
        }
    }
    Some(best)
}

/// Case-insensitive per-character correctness of `input` against `reference`.
/// Positions past the reference are incorrect.
pub fn char_feedback(input: &str, reference: &str) -> Vec<bool> {
    let mut reference = reference.chars();
    input
        .chars()
        .map(|ch| reference.next().is_some_and(|r| chars_eq_ignore_case(ch, r)))
        .collect()
}

pub fn feedback_errors(input: &str, reference: &str) -> usize {
    char_feedback(input, reference)
        .into_iter()
        .filter(|ok| !ok)
        .count()
}
