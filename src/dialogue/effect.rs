//! Effects produced by dialogue transitions
//!
//! Effects are executed by the engine only after the new state has been
//! written back to the session store, so a slow or failed side effect can
//! never leave the dialogue inconsistent with what was computed.

use super::state::Answers;

/// Best-effort side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Notify the downstream payment flow that this sender confirmed
    /// checkout. Fire-and-forget: failures are logged, never retried.
    TriggerCheckout { answers: Answers },
}
