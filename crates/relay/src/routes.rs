//! Route definitions for the minting relay

use axum::{routing::post, Router};

use crate::{handlers, RelayState};

/// Create the relay routes
pub fn create_routes() -> Router<RelayState> {
    Router::new()
        .route("/v1/mint", post(handlers::submit_mint))
        .route("/v1/status", post(handlers::check_status))
}
