//! Intake dialogue state machine
//!
//! Pure transitions: `step` maps (session state, inbound text) to the next
//! state, the reply to send, and any effects to run after the state is
//! committed.

mod effect;
pub mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use state::{Answers, SessionState, Stage};
pub use transition::{step, StepResult};
