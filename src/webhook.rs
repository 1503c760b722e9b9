//! Inbound webhook payload extraction
//!
//! Tolerant parsing of the WhatsApp Cloud API webhook shape. Anything that
//! does not carry a sender and a text body — delivery status callbacks,
//! media messages, malformed payloads — extracts to `None` and must be
//! treated as a no-op upstream.

use serde::Deserialize;
use serde_json::Value;

/// A successfully extracted inbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
struct Change {
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Deserialize, Default)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<WebhookMessage>,
}

#[derive(Debug, Deserialize)]
struct WebhookMessage {
    from: Option<String>,
    text: Option<TextBody>,
}

#[derive(Debug, Deserialize)]
struct TextBody {
    body: Option<String>,
}

/// Extract (sender, text) from a raw webhook payload.
pub fn extract_inbound(payload: &Value) -> Option<InboundMessage> {
    let parsed: WebhookPayload = serde_json::from_value(payload.clone()).ok()?;
    parsed
        .entry
        .into_iter()
        .flat_map(|e| e.changes)
        .flat_map(|c| c.value.messages)
        .find_map(|message| {
            let sender = message.from?;
            let text = message.text?.body?;
            if sender.is_empty() || text.is_empty() {
                return None;
            }
            Some(InboundMessage { sender, text })
        })
}
