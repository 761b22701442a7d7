//! Route definitions for the HTTP API.

pub mod contents;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(contents::routes())
        .with_state(state)
}
