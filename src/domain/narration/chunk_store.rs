use super::model::Chunk;
use std::fmt;
use std::sync::Arc;

/// Rough narration pace at 1x speed, used for display estimates only
pub const WORDS_PER_MINUTE: f32 = 150.0;

/// Display-only duration estimate in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationEstimate {
    pub minutes: u32,
}

impl fmt::Display for DurationEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes < 1 {
            write!(f, "< 1 min")
        } else {
            write!(f, "~{} min", self.minutes)
        }
    }
}

/// Estimate how long a chunk takes to narrate at the given speed.
/// Pure function of word count and speed; it never influences playback.
pub fn estimate_duration(chunk: &Chunk, speed: f32) -> DurationEstimate {
    estimate_words(chunk.word_count(), speed)
}

fn estimate_words(words: usize, speed: f32) -> DurationEstimate {
    if words == 0 || !(speed > 0.0) {
        return DurationEstimate { minutes: 0 };
    }
    let minutes = (words as f32 / (WORDS_PER_MINUTE * speed)).ceil() as u32;
    DurationEstimate { minutes }
}

/// Immutable ordered chunk sequence of one session.
///
/// The sequence is never edited in place: `PlaybackController::load` swaps in a
/// whole new store.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    chunks: Arc<[Chunk]>,
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self {
            chunks: Arc::from(Vec::new()),
        }
    }
}

impl ChunkStore {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks: Arc::from(chunks),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Cheap shared handle to the sequence, for read models
    pub fn shared(&self) -> Arc<[Chunk]> {
        Arc::clone(&self.chunks)
    }

    /// Total narration estimate, `None` when there is nothing loaded
    pub fn total_estimate(&self, speed: f32) -> Option<DurationEstimate> {
        if self.is_empty() {
            return None;
        }
        let words = self.chunks.iter().map(Chunk::word_count).sum();
        Some(estimate_words(words, speed))
    }

    /// Share of the sequence reached once `index` is being narrated
    pub fn progress_percent(&self, index: usize) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let reached = (index + 1).min(self.len());
        reached as f32 / self.len() as f32 * 100.0
    }
}
