pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    health, narration::NarrationController, speech::SpeechController, voices::VoiceController,
};
use crate::domain::tts::SpeechRenderService;
use crate::infrastructure::config::Config;

/// Build the application router with all routes configured
pub fn build_router(
    render_service: Arc<SpeechRenderService>,
    narration_controller: Arc<NarrationController>,
    speech_controller: Arc<SpeechController>,
    voice_controller: Arc<VoiceController>,
) -> Router {
    // Session creation and playback control (the UI side)
    let narration_routes = Router::new()
        .route(
            "/api/documents/:document_id/read-aloud",
            post(NarrationController::start_read_aloud),
        )
        .route(
            "/api/documents/:document_id/summary-read-aloud",
            post(NarrationController::start_summary_read_aloud),
        )
        .route(
            "/api/sessions/:session_id",
            get(NarrationController::get_session).delete(NarrationController::close_session),
        )
        .route("/api/sessions/:session_id/chunks", get(NarrationController::list_chunks))
        .route("/api/sessions/:session_id/reload", post(NarrationController::reload))
        .route("/api/sessions/:session_id/play", post(NarrationController::play))
        .route("/api/sessions/:session_id/pause", post(NarrationController::pause))
        .route("/api/sessions/:session_id/resume", post(NarrationController::resume))
        .route("/api/sessions/:session_id/stop", post(NarrationController::stop))
        .route("/api/sessions/:session_id/seek", post(NarrationController::seek))
        .route("/api/sessions/:session_id/speed", post(NarrationController::set_speed))
        .route("/api/sessions/:session_id/voice", post(NarrationController::set_voice))
        .route(
            "/api/sessions/:session_id/notice/dismiss",
            post(NarrationController::dismiss_notice),
        )
        .with_state(narration_controller);

    // Speaking device routes
    let speech_routes = Router::new()
        .route("/api/sessions/:session_id/utterance", get(SpeechController::get_utterance))
        .route(
            "/api/sessions/:session_id/utterance/audio",
            get(SpeechController::get_utterance_audio),
        )
        .route("/api/sessions/:session_id/signals", post(SpeechController::report_signal))
        .with_state(speech_controller);

    let voice_routes = Router::new()
        .route(
            "/api/voices",
            get(VoiceController::list_voices).put(VoiceController::replace_voices),
        )
        .with_state(voice_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(render_service)
        .merge(narration_routes)
        .merge(speech_routes)
        .merge(voice_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn start_http_server(config: Arc<Config>, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
