use std::sync::Arc;
use async_openai::{config::OpenAIConfig, Client};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use readaloud_backend::controllers::{
    narration::NarrationController, speech::SpeechController, voices::VoiceController,
};
use readaloud_backend::domain::narration::{NarrationService, NarrationSettings};
use readaloud_backend::domain::tts::SpeechRenderService;
use readaloud_backend::domain::voice::VoiceCatalog;
use readaloud_backend::infrastructure::config::{Config, LogFormat};
use readaloud_backend::infrastructure::http::{build_router, start_http_server};
use readaloud_backend::infrastructure::repositories::{
    HttpLearningRepository, LearningRepository, OpenAiTtsRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        development = config.is_development(),
        "Starting Read Aloud Backend on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    tracing::info!(learning_api_url = %config.learning_api_url, "Learning service configured");
    let learning_repo: Arc<dyn LearningRepository> =
        Arc::new(HttpLearningRepository::new(config.learning_api_url.clone()));

    let tts_repo: Option<Arc<dyn TtsRepository>> = match &config.openai_api_key {
        Some(api_key) => {
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            tracing::info!(
                model = %config.openai_tts_model,
                voice = %config.openai_tts_voice,
                "OpenAI speech rendering enabled"
            );
            Some(Arc::new(OpenAiTtsRepository::new(
                Arc::new(openai_client),
                config.openai_tts_model.clone(),
                config.openai_tts_voice.clone(),
            )))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, server-side speech rendering is unavailable");
            None
        }
    };

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let voices = Arc::new(VoiceCatalog::new());
    let narration_service = Arc::new(NarrationService::new(
        learning_repo,
        voices.clone(),
        NarrationSettings {
            chunk_count: config.read_aloud_chunk_count,
            default_speed: config.default_speech_rate,
            summary_max_length: config.summary_max_length,
            session_idle: config.session_idle(),
        },
    ));
    let render_service = Arc::new(SpeechRenderService::new(tts_repo, config.tts_cache_enabled));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let narration_controller = Arc::new(NarrationController::new(narration_service.clone()));
    let speech_controller = Arc::new(SpeechController::new(
        narration_service,
        render_service.clone(),
    ));
    let voice_controller = Arc::new(VoiceController::new(voices));

    // Start HTTP server with all routes
    let app = build_router(render_service, narration_controller, speech_controller, voice_controller);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "readaloud_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "readaloud_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
