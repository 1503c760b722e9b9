//! Dialogue state types

use serde::{Deserialize, Serialize};

/// Position within the fixed 5-step intake script. The variant names what
/// the *next* inbound message means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Fresh or reset session; the next message starts the script.
    #[default]
    Greeting,
    AwaitingNeed,
    AwaitingBudget,
    AwaitingLocation,
    AwaitingConfirmation,
}

/// Answers collected so far, populated one field per stage passed.
///
/// Invariant: exactly the fields for stages already passed are `Some` —
/// at `AwaitingLocation`, `need` and `budget` are set but `location` is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Answers {
    pub need: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,
}

/// Per-sender dialogue record held in the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionState {
    pub stage: Stage,
    pub answers: Answers,
}
