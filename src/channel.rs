//! Outbound collaborators: reply delivery and checkout notification
//!
//! Trait seams so the engine can be exercised with recording doubles in
//! tests and wired to the real messaging channel in production.

use crate::dialogue::Answers;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Delivery/notification error with classification. Never retried by the
/// engine; callers log and move on.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("network error: {0}")]
    Network(String),
    #[error("channel API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Delivery to the messaging channel.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, recipient: &str, text: &str) -> Result<(), ChannelError>;
}

/// Best-effort notification to the downstream payment flow.
#[async_trait]
pub trait CheckoutNotifier: Send + Sync {
    async fn trigger_checkout(&self, recipient: &str, answers: &Answers)
        -> Result<(), ChannelError>;
}

// ============================================================================
// WhatsApp Cloud API sender
// ============================================================================

pub struct WhatsAppClient {
    client: Client,
    access_token: String,
    messages_url: String,
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

impl WhatsAppClient {
    pub fn new(access_token: String, phone_number_id: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            access_token,
            messages_url: format!("https://graph.facebook.com/v19.0/{phone_number_id}/messages"),
        }
    }
}

#[async_trait]
impl ReplySender for WhatsAppClient {
    async fn send_reply(&self, recipient: &str, text: &str) -> Result<(), ChannelError> {
        let request = SendMessageRequest {
            messaging_product: "whatsapp",
            to: recipient,
            kind: "text",
            text: TextBody { body: text },
        };

        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Fallback when no WhatsApp credentials are configured: the dialogue keeps
/// working and replies only show up in the logs.
pub struct LogOnlySender;

#[async_trait]
impl ReplySender for LogOnlySender {
    async fn send_reply(&self, recipient: &str, text: &str) -> Result<(), ChannelError> {
        tracing::info!(recipient = %recipient, reply = %text, "reply (log-only sender)");
        Ok(())
    }
}

// ============================================================================
// Checkout notifiers
// ============================================================================

pub struct HttpCheckoutNotifier {
    client: Client,
    url: String,
}

#[derive(Serialize)]
struct CheckoutNotification<'a> {
    sender: &'a str,
    need: Option<&'a str>,
    budget: Option<&'a str>,
    location: Option<&'a str>,
}

impl HttpCheckoutNotifier {
    pub fn new(url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, url }
    }
}

#[async_trait]
impl CheckoutNotifier for HttpCheckoutNotifier {
    async fn trigger_checkout(
        &self,
        recipient: &str,
        answers: &Answers,
    ) -> Result<(), ChannelError> {
        let notification = CheckoutNotification {
            sender: recipient,
            need: answers.need.as_deref(),
            budget: answers.budget.as_deref(),
            location: answers.location.as_deref(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&notification)
            .send()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Used when no checkout webhook is configured.
pub struct NoopCheckout;

#[async_trait]
impl CheckoutNotifier for NoopCheckout {
    async fn trigger_checkout(
        &self,
        recipient: &str,
        _answers: &Answers,
    ) -> Result<(), ChannelError> {
        tracing::debug!(recipient = %recipient, "checkout confirmed (no checkout URL configured)");
        Ok(())
    }
}

// ============================================================================
// Test doubles
// ============================================================================
