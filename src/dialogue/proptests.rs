//! Property-based tests for the dialogue state machine

use super::state::{Answers, SessionState, Stage};
use super::transition::step;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    // Includes whitespace-heavy, empty, and yes-like strings.
    prop_oneof![
        ".{0,40}",
        Just(String::new()),
        Just("yes".to_string()),
        Just("  YES  ".to_string()),
        Just("no".to_string()),
    ]
}

/// States that satisfy the answers invariant: exactly the fields for stages
/// already passed are set.
fn arb_session_state() -> impl Strategy<Value = SessionState> {
    (0..5u8, "[a-zA-Z0-9 ]{1,20}", "[0-9]{1,6}", "[a-zA-Z ]{1,20}").prop_map(
        |(stage, need, budget, location)| {
            let (stage, answers) = match stage {
                0 => (Stage::Greeting, Answers::default()),
                1 => (Stage::AwaitingNeed, Answers::default()),
                2 => (
                    Stage::AwaitingBudget,
                    Answers {
                        need: Some(need),
                        ..Answers::default()
                    },
                ),
                3 => (
                    Stage::AwaitingLocation,
                    Answers {
                        need: Some(need),
                        budget: Some(budget),
                        location: None,
                    },
                ),
                _ => (
                    Stage::AwaitingConfirmation,
                    Answers {
                        need: Some(need),
                        budget: Some(budget),
                        location: Some(location),
                    },
                ),
            };
            SessionState { stage, answers }
        },
    )
}

fn expected_next_stage(stage: Stage) -> Stage {
    match stage {
        Stage::Greeting => Stage::AwaitingNeed,
        Stage::AwaitingNeed => Stage::AwaitingBudget,
        Stage::AwaitingBudget => Stage::AwaitingLocation,
        Stage::AwaitingLocation => Stage::AwaitingConfirmation,
        Stage::AwaitingConfirmation => Stage::Greeting,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Identical (state, input) pairs always yield identical results.
    #[test]
    fn step_is_pure(state in arb_session_state(), text in arb_text()) {
        prop_assert_eq!(step(&state, &text), step(&state, &text));
    }

    /// Every stage has exactly one successor regardless of input: the
    /// machine never rejects, never re-prompts, never gets stuck.
    #[test]
    fn every_input_advances_to_the_single_successor(
        state in arb_session_state(),
        text in arb_text(),
    ) {
        let result = step(&state, &text);
        prop_assert_eq!(result.next.stage, expected_next_stage(state.stage));
        prop_assert!(!result.reply.is_empty());
    }

    /// The answers invariant is preserved across every transition.
    #[test]
    fn answers_match_stages_passed(state in arb_session_state(), text in arb_text()) {
        let next = step(&state, &text).next;
        let answers = &next.answers;
        let expected = match next.stage {
            Stage::Greeting | Stage::AwaitingNeed => (false, false, false),
            Stage::AwaitingBudget => (true, false, false),
            Stage::AwaitingLocation => (true, true, false),
            Stage::AwaitingConfirmation => (true, true, true),
        };
        prop_assert_eq!(
            (answers.need.is_some(), answers.budget.is_some(), answers.location.is_some()),
            expected
        );
    }

    /// Both confirmation branches reset to the fresh state, and only a
    /// trimmed case-insensitive "yes" produces a checkout effect.
    #[test]
    fn confirmation_always_resets(state in arb_session_state(), text in arb_text()) {
        let result = step(&state, &text);
        if state.stage == Stage::AwaitingConfirmation {
            prop_assert_eq!(result.next, SessionState::default());
            let is_yes = text.trim().eq_ignore_ascii_case("yes");
            prop_assert_eq!(result.effects.is_empty(), !is_yes);
        } else {
            prop_assert!(result.effects.is_empty());
        }
    }
}
