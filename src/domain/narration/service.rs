use super::controller::{PlaybackController, UserIntent};
use super::error::NarrationError;
use super::model::{Chunk, ChunkRecord, PlaybackSnapshot};
use super::adapter::SynthesisSignal;
use super::session::{SessionHandle, SessionSource};
use crate::domain::document::{
    count_sentences, normalize_whitespace, SummaryType, MIN_READ_ALOUD_SENTENCES,
};
use crate::domain::voice::VoiceCatalog;
use crate::infrastructure::repositories::LearningRepository;
use crate::infrastructure::speech::{DeviceLink, DeviceSpeechAdapter};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Tunables for new sessions
#[derive(Debug, Clone)]
pub struct NarrationSettings {
    pub chunk_count: usize,
    pub default_speed: f32,
    pub summary_max_length: u32,
    pub session_idle: Duration,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            chunk_count: 8,
            default_speed: 1.0,
            summary_max_length: 500,
            session_idle: Duration::from_secs(30 * 60),
        }
    }
}

/// A running session together with the link its speaking device polls
#[derive(Clone)]
pub struct NarrationSession {
    pub handle: SessionHandle,
    pub device: DeviceLink,
}

pub struct NarrationService {
    learning_repo: Arc<dyn LearningRepository>,
    voices: Arc<VoiceCatalog>,
    settings: NarrationSettings,
    sessions: Cache<Uuid, NarrationSession>,
}

impl NarrationService {
    pub fn new(
        learning_repo: Arc<dyn LearningRepository>,
        voices: Arc<VoiceCatalog>,
        settings: NarrationSettings,
    ) -> Self {
        // Dropping the last handle ends the session task, so idle sessions
        // stop themselves when they fall out of the cache.
        let sessions = Cache::builder()
            .max_capacity(1_000)
            .time_to_idle(settings.session_idle)
            .build();

        Self {
            learning_repo,
            voices,
            settings,
            sessions,
        }
    }
}

#[async_trait]
pub trait NarrationServiceApi: Send + Sync {
    /// Chunk a document and open an idle session over it
    async fn start_document_session(&self, document_id: &str) -> Result<NarrationSession, NarrationError>;

    /// Summarize a document and open an idle single-chunk session over the summary
    async fn start_summary_session(
        &self,
        document_id: &str,
        summary_type: SummaryType,
        max_length: Option<u32>,
    ) -> Result<NarrationSession, NarrationError>;

    async fn get_session(&self, session_id: Uuid) -> Result<NarrationSession, NarrationError>;

    /// Apply a user intent and return the resulting snapshot
    async fn dispatch(&self, session_id: Uuid, intent: UserIntent) -> Result<PlaybackSnapshot, NarrationError>;

    /// Select a voice, falling back to the catalog default when it is unknown
    async fn set_voice(&self, session_id: Uuid, voice_id: Option<String>) -> Result<PlaybackSnapshot, NarrationError>;

    /// Feed a start/end/error signal reported by the speaking device
    async fn report_signal(&self, session_id: Uuid, signal: SynthesisSignal) -> Result<PlaybackSnapshot, NarrationError>;

    /// Stop reading, fetch the session's chunks again and load them
    async fn reload(&self, session_id: Uuid) -> Result<PlaybackSnapshot, NarrationError>;

    /// Stop and forget a session
    async fn close(&self, session_id: Uuid) -> Result<(), NarrationError>;
}

#[async_trait]
impl NarrationServiceApi for NarrationService {
    async fn start_document_session(&self, document_id: &str) -> Result<NarrationSession, NarrationError> {
        let source = SessionSource::Document {
            document_id: document_id.to_string(),
        };
        self.open(source).await
    }

    async fn start_summary_session(
        &self,
        document_id: &str,
        summary_type: SummaryType,
        max_length: Option<u32>,
    ) -> Result<NarrationSession, NarrationError> {
        let max_length = max_length.unwrap_or(self.settings.summary_max_length);
        if max_length == 0 {
            return Err(NarrationError::Invalid("max_length must be positive".to_string()));
        }
        let source = SessionSource::Summary {
            document_id: document_id.to_string(),
            summary_type,
            max_length,
        };
        self.open(source).await
    }

    async fn get_session(&self, session_id: Uuid) -> Result<NarrationSession, NarrationError> {
        self.sessions
            .get(&session_id)
            .await
            .ok_or(NarrationError::SessionNotFound(session_id))
    }

    async fn dispatch(&self, session_id: Uuid, intent: UserIntent) -> Result<PlaybackSnapshot, NarrationError> {
        let session = self.get_session(session_id).await?;
        tracing::debug!(session_id = %session_id, intent = ?intent, "Dispatching playback intent");
        session.handle.send(intent).await
    }

    async fn set_voice(&self, session_id: Uuid, voice_id: Option<String>) -> Result<PlaybackSnapshot, NarrationError> {
        let resolved = self.voices.resolve(voice_id.as_deref());
        self.dispatch(session_id, UserIntent::SetVoice { voice_id: resolved }).await
    }

    async fn report_signal(&self, session_id: Uuid, signal: SynthesisSignal) -> Result<PlaybackSnapshot, NarrationError> {
        let session = self.get_session(session_id).await?;
        tracing::debug!(session_id = %session_id, signal = ?signal, "Device signal received");
        session.handle.send(signal).await
    }

    async fn reload(&self, session_id: Uuid) -> Result<PlaybackSnapshot, NarrationError> {
        let session = self.get_session(session_id).await?;
        session.handle.send(UserIntent::Stop).await?;

        let chunks = self.fetch_chunks(session.handle.source()).await?;
        tracing::info!(session_id = %session_id, chunk_count = chunks.len(), "Session reloaded");
        session.handle.send(UserIntent::Load { chunks }).await
    }

    async fn close(&self, session_id: Uuid) -> Result<(), NarrationError> {
        let session = self.get_session(session_id).await?;
        self.sessions.invalidate(&session_id).await;
        // The task may already be gone; either way nothing is speaking any more.
        if let Err(e) = session.handle.send(UserIntent::Stop).await {
            tracing::debug!(session_id = %session_id, error = %e, "Session already closed");
        }
        tracing::info!(session_id = %session_id, "Narration session removed");
        Ok(())
    }
}

impl NarrationService {
    async fn open(&self, source: SessionSource) -> Result<NarrationSession, NarrationError> {
        let chunks = self.fetch_chunks(&source).await?;

        let (adapter, device) = DeviceSpeechAdapter::new();
        let voice_id = self.voices.resolve(None);
        let controller = PlaybackController::new(adapter, self.settings.default_speed, voice_id);
        let handle = SessionHandle::spawn(source, controller, chunks);

        let session = NarrationSession { handle, device };
        self.sessions.insert(session.handle.id(), session.clone()).await;
        Ok(session)
    }

    async fn fetch_chunks(&self, source: &SessionSource) -> Result<Vec<Chunk>, NarrationError> {
        match source {
            SessionSource::Document { document_id } => self.document_chunks(document_id).await,
            SessionSource::Summary {
                document_id,
                summary_type,
                max_length,
            } => self.summary_chunks(document_id, *summary_type, *max_length).await,
        }
    }

    async fn document_chunks(&self, document_id: &str) -> Result<Vec<Chunk>, NarrationError> {
        let document = self
            .learning_repo
            .fetch_document_text(document_id)
            .await
            .map_err(NarrationError::Dependency)?
            .ok_or_else(|| NarrationError::DocumentNotFound(document_id.to_string()))?;

        let sentences: Vec<String> = document
            .sentences
            .into_iter()
            .map(|sentence| normalize_whitespace(&sentence))
            .filter(|sentence| !sentence.is_empty())
            .collect();

        if sentences.len() < MIN_READ_ALOUD_SENTENCES {
            return Err(NarrationError::DocumentTooShort {
                sentences: sentences.len(),
                required: MIN_READ_ALOUD_SENTENCES,
            });
        }

        let records = self
            .learning_repo
            .fetch_chunks(&sentences, self.settings.chunk_count)
            .await
            .map_err(NarrationError::Dependency)?;

        let chunks = Chunk::from_records(records);
        tracing::info!(
            document_id,
            sentence_count = sentences.len(),
            chunk_count = chunks.len(),
            "Document chunked for read aloud"
        );
        Ok(chunks)
    }

    async fn summary_chunks(
        &self,
        document_id: &str,
        summary_type: SummaryType,
        max_length: u32,
    ) -> Result<Vec<Chunk>, NarrationError> {
        let summary = self
            .learning_repo
            .generate_summary(document_id, summary_type, max_length)
            .await
            .map_err(NarrationError::Dependency)?;

        let text = normalize_whitespace(&summary);
        if text.is_empty() {
            return Err(NarrationError::EmptySummary);
        }

        let num_sentences = count_sentences(&text);
        Ok(Chunk::from_records(vec![ChunkRecord {
            chunk_id: Some(0),
            text,
            num_sentences,
        }]))
    }
}
