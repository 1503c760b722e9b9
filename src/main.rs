//! Intake bot - WhatsApp commerce intake service
//!
//! Drives a fixed 5-stage intake dialogue per sender on top of a bounded
//! (LRU + TTL) in-memory session store.

mod api;
mod channel;
mod dialogue;
mod engine;
mod session;
mod webhook;

use api::{create_router, AppState};
use channel::{
    CheckoutNotifier, HttpCheckoutNotifier, LogOnlySender, NoopCheckout, ReplySender,
    WhatsAppClient,
};
use engine::Engine;
use session::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("INTAKE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let max_entries: usize = std::env::var("SESSION_MAX_ENTRIES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000);

    let ttl_secs: u64 = std::env::var("SESSION_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);

    let store = SessionStore::new(max_entries, Duration::from_secs(ttl_secs));
    tracing::info!(max_entries, ttl_secs, "session store initialized");

    // Outbound collaborators
    let sender: Arc<dyn ReplySender> = match (
        std::env::var("WHATSAPP_ACCESS_TOKEN"),
        std::env::var("WHATSAPP_PHONE_NUMBER_ID"),
    ) {
        (Ok(token), Ok(phone_number_id)) => {
            tracing::info!(phone_number_id = %phone_number_id, "WhatsApp sender configured");
            Arc::new(WhatsAppClient::new(token, &phone_number_id))
        }
        _ => {
            tracing::warn!(
                "WHATSAPP_ACCESS_TOKEN / WHATSAPP_PHONE_NUMBER_ID not set; \
                 replies will only be logged"
            );
            Arc::new(LogOnlySender)
        }
    };

    let checkout: Arc<dyn CheckoutNotifier> = match std::env::var("CHECKOUT_URL") {
        Ok(url) => {
            tracing::info!(url = %url, "checkout notifier configured");
            Arc::new(HttpCheckoutNotifier::new(url))
        }
        Err(_) => Arc::new(NoopCheckout),
    };

    let verify_token = std::env::var("WEBHOOK_VERIFY_TOKEN").ok();
    if verify_token.is_none() {
        tracing::warn!("WEBHOOK_VERIFY_TOKEN not set; webhook verification will be rejected");
    }

    // Create application state
    let engine = Arc::new(Engine::new(store, sender, checkout));
    let state = AppState::new(engine, verify_token);

    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("intake-bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
