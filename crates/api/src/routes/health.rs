use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::state::AppState;

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
