use crate::content::Answer;
use crate::engine::matcher;
use crate::session::drill::{DrillState, DrillTarget};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputOutcome {
    pub error_count: usize,
    pub completed: bool,
}

/// Replaces the drill's input with `value` and recomputes everything derived
/// from it. Error count is always derived, never accumulated.
pub fn process_input(drill: &mut DrillState, value: &str) -> InputOutcome {
    drill.input.clear();
    drill.input.push_str(value);
    drill.verdict = None;

    drill.error_count = match &drill.target {
        DrillTarget::Exact(text) => matcher::positional_errors(value, text),
        DrillTarget::AnyOf(answers) => {
            drill.best_match = matcher::best_match(value, answers_as_str(answers).as_slice());
            matcher::feedback_errors(value, drill.reference())
        }
    };

    let completed = drill.is_complete();
    if completed {
        drill.finished = true;
        drill.solved = true;
    }
    InputOutcome {
        error_count: drill.error_count,
        completed,
    }
}

/// Explicit check of a builder answer. A miss records a "try again" verdict.
pub fn process_submit(drill: &mut DrillState) -> bool {
    let correct = drill.is_complete();
    drill.verdict = Some(correct);
    if correct {
        drill.finished = true;
        drill.solved = true;
    } else {
        drill.failed_submits += 1;
    }
    correct
}

fn answers_as_str(answers: &[Answer]) -> Vec<&str> {
    answers.iter().map(|a| a.target.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_errors_recomputed_each_change() {
        let mut drill = DrillState::new(DrillTarget::Exact("Ich bin müde heute".into()));
        assert_eq!(process_input(&mut drill, "Ich bin mu").error_count, 1);
        assert_eq!(process_input(&mut drill, "Ich bin m").error_count, 0);
        let outcome = process_input(&mut drill, "Ich bin müde heute");
        assert!(outcome.completed);
        assert_eq!(outcome.error_count, 0);
        assert!(drill.finished);
    }

    #[test]
    fn test_builder_completion_is_normalized() {
        let mut drill = DrillState::new(DrillTarget::AnyOf(vec![Answer::new(
            "Ich lese ein Buch",
            "I read a book",
        )]));
        let outcome = process_input(&mut drill, "  ich   LESE ein buch ");
        assert!(outcome.completed);
    }

    #[test]
    fn test_submit_miss_sets_verdict() {
        let mut drill = DrillState::new(DrillTarget::AnyOf(vec![Answer::new("Ich lese", "")]));
        process_input(&mut drill, "Ich lesen");
        assert!(!process_submit(&mut drill));
        assert_eq!(drill.verdict, Some(false));
        assert_eq!(drill.failed_submits, 1);
        // Typing again clears the verdict.
        process_input(&mut drill, "Ich lese");
        assert_eq!(drill.verdict, None);
    }
}
