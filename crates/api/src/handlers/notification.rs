//! Handlers for the internal notification trigger endpoints.
//!
//! Both endpoints are invoked by infrastructure (a scheduler and the
//! comment-creation path), not by end users.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use dealdrop_dispatch::CommentEvent;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /internal/notifications/drain
///
/// Run one drain cycle over the notification queue and return its outcome
/// counts. Invoked on a fixed schedule; takes no input beyond "now".
pub async fn drain(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let report = state.drainer.drain_once(Utc::now()).await?;
    Ok(Json(serde_json::json!({ "data": report })))
}

/// POST /internal/notifications/mention
///
/// Fan out push notifications for a freshly created comment. A payload
/// missing any required field is rejected by deserialization before any
/// store access.
pub async fn mention(
    State(state): State<AppState>,
    Json(event): Json<CommentEvent>,
) -> AppResult<Json<serde_json::Value>> {
    let report = state.fanout.notify(&event).await?;
    Ok(Json(serde_json::json!({ "data": report })))
}
