//! Route definitions.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod notification;

/// All internal trigger routes.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/internal/notifications", notification::router())
}
