//! API request and response types

use serde::{Deserialize, Serialize};

/// Query parameters of the webhook verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Acknowledgement for an inbound webhook POST. Always returned with 200:
/// payloads we cannot extract a message from are accepted no-ops.
#[derive(Debug, Serialize)]
pub struct ReceivedResponse {
    pub received: bool,
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub active_sessions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
