use async_trait::async_trait;

/// Voice and pace to render speech with
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechParams {
    pub voice: Option<String>,
    pub speed: f32,
}

/// Repository for server-side speech rendering.
/// Abstracts the underlying TTS provider (OpenAI, ...) used when the speaking
/// device has no speech engine of its own.
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Mapping the requested voice onto a provider voice
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, params: &SpeechParams) -> Result<Vec<u8>, String>;
}
