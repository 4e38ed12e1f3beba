use serde::{Deserialize, Serialize};

/// One ordered, immutable unit of narration text (a group of adjacent sentences)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: u32,
    pub order: usize,
    pub text: String,
    pub sentence_count: u32,
}

/// Chunk record as returned by the chunk provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<u32>,
    pub text: String,
    #[serde(default)]
    pub num_sentences: u32,
}

impl Chunk {
    /// Build chunks from provider records, keeping the provider's order
    pub fn from_records(records: Vec<ChunkRecord>) -> Vec<Chunk> {
        records
            .into_iter()
            .enumerate()
            .map(|(order, record)| Chunk {
                id: record.chunk_id.unwrap_or(order as u32),
                order,
                text: record.text,
                sentence_count: record.num_sentences,
            })
            .collect()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
}

/// Non-fatal, dismissible message raised when synthesis fails mid-utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub chunk_index: usize,
    pub generation: u64,
}

/// Read model of one playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub current_index: usize,
    pub chunk_count: usize,
    pub speed: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    pub generation: u64,
    pub progress_percent: f32,
    pub total_estimate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}
