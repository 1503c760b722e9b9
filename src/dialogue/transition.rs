//! Pure dialogue transition function

use super::state::{Answers, SessionState, Stage};
use super::Effect;

const ASK_NEED: &str =
    "Welcome! I can put together a quote for you. First things first: what do you need?";
const ASK_BUDGET: &str = "Got it. What budget do you have in mind?";
const ASK_LOCATION: &str = "Thanks. And where are you located?";
const CONFIRMED: &str =
    "Perfect - your order is headed to checkout. You'll receive a payment link shortly.";
const DECLINED: &str = "No problem. Message me any time to start over.";

/// Result of a dialogue step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub next: SessionState,
    pub reply: String,
    pub effects: Vec<Effect>,
}

impl StepResult {
    fn new(next: SessionState, reply: impl Into<String>) -> Self {
        Self {
            next,
            reply: reply.into(),
            effects: vec![],
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Advance the dialogue by one inbound message.
///
/// Pure: identical (state, text) pairs always yield identical results.
/// Every stage has exactly one outgoing transition partitioned only by the
/// stage, never by input validity — any text is accepted verbatim, and the
/// machine never re-prompts for the same stage.
pub fn step(state: &SessionState, text: &str) -> StepResult {
    match state.stage {
        // The opening message itself is discarded; it only starts the script.
        Stage::Greeting => StepResult::new(
            SessionState {
                stage: Stage::AwaitingNeed,
                answers: Answers::default(),
            },
            ASK_NEED,
        ),

        Stage::AwaitingNeed => {
            let mut answers = state.answers.clone();
            answers.need = Some(text.to_string());
            StepResult::new(
                SessionState {
                    stage: Stage::AwaitingBudget,
                    answers,
                },
                ASK_BUDGET,
            )
        }

        Stage::AwaitingBudget => {
            let mut answers = state.answers.clone();
            answers.budget = Some(text.to_string());
            StepResult::new(
                SessionState {
                    stage: Stage::AwaitingLocation,
                    answers,
                },
                ASK_LOCATION,
            )
        }

        Stage::AwaitingLocation => {
            let mut answers = state.answers.clone();
            answers.location = Some(text.to_string());
            let reply = offer_reply(&answers);
            StepResult::new(
                SessionState {
                    stage: Stage::AwaitingConfirmation,
                    answers,
                },
                reply,
            )
        }

        // Single-shot per completion: both branches reset to a fresh
        // session with cleared answers.
        Stage::AwaitingConfirmation => {
            if text.trim().eq_ignore_ascii_case("yes") {
                StepResult::new(SessionState::default(), CONFIRMED).with_effect(
                    Effect::TriggerCheckout {
                        answers: state.answers.clone(),
                    },
                )
            } else {
                StepResult::new(SessionState::default(), DECLINED)
            }
        }
    }
}

fn offer_reply(answers: &Answers) -> String {
    format!(
        "To confirm: you need {need}, with a budget of {budget}, in {location}. \
         Reply YES to proceed to checkout.",
        need = answers.need.as_deref().unwrap_or("(not given)"),
        budget = answers.budget.as_deref().unwrap_or("(not given)"),
        location = answers.location.as_deref().unwrap_or("(not given)"),
    )
}
