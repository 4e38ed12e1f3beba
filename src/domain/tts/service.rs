use super::error::SpeechRenderError;
use crate::infrastructure::repositories::{SpeechParams, TtsRepository};
use crate::infrastructure::speech::Utterance;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

const CHARACTERS_PER_MINUTE: f32 = 1000.0;

#[derive(Debug, Clone)]
pub struct RenderedSpeech {
    pub audio_data: Vec<u8>,
    pub char_count: usize,
    pub duration_minutes: f32,
}

/// Server-side rendering of the outstanding utterance, for speaking devices
/// without a speech engine of their own
pub struct SpeechRenderService {
    tts_repo: Option<Arc<dyn TtsRepository>>,
    cache: Option<Cache<String, RenderedSpeech>>,
}

impl SpeechRenderService {
    pub fn new(tts_repo: Option<Arc<dyn TtsRepository>>, cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self { tts_repo, cache }
    }

    fn cache_key(utterance: &Utterance) -> String {
        format!(
            "{}|{:.2}|{}",
            utterance.voice_id.as_deref().unwrap_or_default(),
            utterance.rate,
            utterance.text
        )
    }
}

#[async_trait]
pub trait SpeechRenderApi: Send + Sync {
    /// Whether a rendering provider is configured
    fn is_available(&self) -> bool;

    /// Render an utterance to MP3 audio at its voice and rate
    async fn render(&self, utterance: &Utterance) -> Result<RenderedSpeech, SpeechRenderError>;
}

#[async_trait]
impl SpeechRenderApi for SpeechRenderService {
    fn is_available(&self) -> bool {
        self.tts_repo.is_some()
    }

    async fn render(&self, utterance: &Utterance) -> Result<RenderedSpeech, SpeechRenderError> {
        let tts_repo = self.tts_repo.as_ref().ok_or(SpeechRenderError::Unavailable)?;

        let text = utterance.text.trim();
        if text.is_empty() {
            return Err(SpeechRenderError::Invalid("Utterance has no text".to_string()));
        }

        let key = Self::cache_key(utterance);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                tracing::info!(
                    generation = utterance.generation,
                    index = utterance.index,
                    cached_audio_size = cached.audio_data.len(),
                    "Speech cache hit - returning cached audio"
                );
                return Ok(cached);
            }
        }

        let params = SpeechParams {
            voice: utterance.voice_id.clone(),
            speed: utterance.rate,
        };
        let audio_data = tts_repo
            .synthesize(text, &params)
            .await
            .map_err(SpeechRenderError::Dependency)?;

        let char_count = text.chars().count();
        let rendered = RenderedSpeech {
            audio_data,
            char_count,
            duration_minutes: char_count as f32 / (CHARACTERS_PER_MINUTE * utterance.rate.max(0.25)),
        };

        if let Some(cache) = &self.cache {
            cache.insert(key, rendered.clone()).await;
            tracing::debug!(
                generation = utterance.generation,
                index = utterance.index,
                audio_size = rendered.audio_data.len(),
                "Speech render cached"
            );
        }

        Ok(rendered)
    }
}
