//! Route definitions for the internal notification triggers.

use axum::routing::post;
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/internal/notifications`.
///
/// ```text
/// POST   /drain     -> drain
/// POST   /mention   -> mention
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/drain", post(notification::drain))
        .route("/mention", post(notification::mention))
}
