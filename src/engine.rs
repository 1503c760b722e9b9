//! Inbound message engine
//!
//! Orchestrates one inbound event end to end: extract (sender, text) →
//! session lookup-or-default → pure dialogue step → session write-back →
//! reply and effects. The write-back happens before any delivery is
//! attempted, so a slow or failed send never leaves the dialogue state
//! inconsistent with what was computed. Delivery failures are logged and
//! never retried or propagated.

use crate::channel::{CheckoutNotifier, ReplySender};
use crate::dialogue::{step, Effect};
use crate::session::SessionStore;
use crate::webhook::extract_inbound;
use serde_json::Value;
use std::sync::Arc;

/// What `handle_inbound` did with a payload, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// No extractable sender/text; the session store was not touched.
    Ignored,
    /// The dialogue advanced and a reply was dispatched.
    Replied,
}

/// The conversation engine with its injected session store and
/// collaborators.
pub struct Engine<S: ?Sized, C: ?Sized> {
    store: SessionStore,
    sender: Arc<S>,
    checkout: Arc<C>,
}

/// Concrete engine type the HTTP layer holds: collaborators chosen at
/// startup from the environment.
pub type ProductionEngine = Engine<dyn ReplySender, dyn CheckoutNotifier>;

impl<S, C> Engine<S, C>
where
    S: ReplySender + ?Sized,
    C: CheckoutNotifier + ?Sized,
{
    pub fn new(store: SessionStore, sender: Arc<S>, checkout: Arc<C>) -> Self {
        Self {
            store,
            sender,
            checkout,
        }
    }

    pub fn session_count(&self) -> usize {
        self.store.len()
    }

    /// Handle one raw webhook payload. Infallible by design: malformed
    /// payloads are a silent no-op, and everything downstream of the
    /// committed transition is best-effort.
    pub async fn handle_inbound(&self, payload: &Value) -> InboundOutcome {
        let Some(inbound) = extract_inbound(payload) else {
            tracing::debug!("ignoring webhook payload with no inbound text message");
            return InboundOutcome::Ignored;
        };

        let current = self.store.get(&inbound.sender).unwrap_or_default();
        let result = step(&current, &inbound.text);

        tracing::info!(
            sender = %inbound.sender,
            from_stage = ?current.stage,
            to_stage = ?result.next.stage,
            "dialogue advanced"
        );

        // Commit before any delivery is attempted.
        self.store.set(&inbound.sender, result.next);

        if let Err(err) = self.sender.send_reply(&inbound.sender, &result.reply).await {
            tracing::warn!(sender = %inbound.sender, error = %err, "reply delivery failed");
        }

        for effect in result.effects {
            match effect {
                Effect::TriggerCheckout { answers } => {
                    if let Err(err) =
                        self.checkout.trigger_checkout(&inbound.sender, &answers).await
                    {
                        tracing::warn!(
                            sender = %inbound.sender,
                            error = %err,
                            "checkout notification failed"
                        );
                    }
                }
            }
        }

        InboundOutcome::Replied
    }
}
