use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::{SpeechRenderApi, SpeechRenderService};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Sessions never depend on the renderer, so the service is ready either way;
/// the body says whether server-side audio is on offer.
pub async fn health_ready(State(render_service): State<Arc<SpeechRenderService>>) -> impl IntoResponse {
    let tts = if render_service.is_available() {
        "available"
    } else {
        "unavailable"
    };
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "tts": tts
        })),
    )
}
