pub mod adapter;
pub mod chunk_store;
pub mod controller;
pub mod error;
pub mod model;
pub mod service;
pub mod session;

pub use adapter::{RequestHandle, SpeakRejected, SynthesisAdapter, SynthesisRequest, SynthesisSignal};
pub use chunk_store::{estimate_duration, ChunkStore, DurationEstimate};
pub use controller::{PlaybackController, PlaybackEvent, UserIntent};
pub use error::NarrationError;
pub use model::{Chunk, ChunkRecord, Notice, PlaybackSnapshot, PlaybackStatus};
pub use service::{NarrationService, NarrationServiceApi, NarrationSession, NarrationSettings};
pub use session::{SessionHandle, SessionSource, SessionView};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response for session endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub source: SessionSource,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub playback: PlaybackSnapshot,
}

impl SessionResponse {
    pub fn new(handle: &SessionHandle, playback: PlaybackSnapshot) -> Self {
        Self {
            id: handle.id(),
            source: handle.source().clone(),
            created_at: handle.created_at(),
            playback,
        }
    }
}

impl From<&SessionHandle> for SessionResponse {
    fn from(handle: &SessionHandle) -> Self {
        Self::new(handle, handle.snapshot())
    }
}

/// One chunk with its narration estimate at the session's current speed
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub id: u32,
    pub order: usize,
    pub text: String,
    pub sentence_count: u32,
    pub estimate: String,
}

/// Response for GET /api/sessions/:session_id/chunks
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunksResponse {
    pub current_index: usize,
    pub chunks: Vec<ChunkResponse>,
}

impl From<SessionView> for ChunksResponse {
    fn from(view: SessionView) -> Self {
        let speed = view.snapshot.speed;
        Self {
            current_index: view.snapshot.current_index,
            chunks: view
                .chunks
                .iter()
                .map(|chunk| ChunkResponse {
                    id: chunk.id,
                    order: chunk.order,
                    text: chunk.text.clone(),
                    sentence_count: chunk.sentence_count,
                    estimate: estimate_duration(chunk, speed).to_string(),
                })
                .collect(),
        }
    }
}

/// Request for POST /api/sessions/:session_id/play
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PlayRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_index: Option<usize>,
}

/// Request for POST /api/sessions/:session_id/seek
#[derive(Debug, Serialize, Deserialize)]
pub struct SeekRequest {
    pub index: usize,
}

/// Request for POST /api/sessions/:session_id/speed
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeedRequest {
    pub speed: f32,
}

/// Request for POST /api/sessions/:session_id/voice
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceRequest {
    #[serde(default)]
    pub voice_id: Option<String>,
}
