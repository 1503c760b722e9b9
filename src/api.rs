//! HTTP surface for the intake bot

mod handlers;
mod types;

pub use handlers::create_router;

use crate::engine::ProductionEngine;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProductionEngine>,
    /// Expected `hub.verify_token` for the webhook verification handshake.
    pub verify_token: Option<String>,
}

impl AppState {
    pub fn new(engine: Arc<ProductionEngine>, verify_token: Option<String>) -> Self {
        Self {
            engine,
            verify_token,
        }
    }
}
