//! Narrated-playback state machine.
//!
//! The controller walks an ordered chunk sequence through a [`SynthesisAdapter`],
//! one outstanding request at a time. Every request is tagged with the
//! generation that was current when it was issued; any operation that makes an
//! in-flight request irrelevant (stop, seek, a fresh play, a speed or voice
//! change while playing, loading new chunks) bumps the generation, so signals
//! that arrive later for the old request are recognised as stale and dropped.
//!
//! All input arrives as [`PlaybackEvent`]s processed one at a time from a FIFO
//! queue. Follow-up events produced while handling one (a request the adapter
//! refuses up front) are queued behind it instead of being handled recursively.

use super::adapter::{RequestHandle, SpeakRejected, SynthesisAdapter, SynthesisRequest, SynthesisSignal};
use super::chunk_store::ChunkStore;
use super::error::NarrationError;
use super::model::{Chunk, Notice, PlaybackSnapshot, PlaybackStatus};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Something the user asked the player to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UserIntent {
    Play {
        #[serde(default)]
        from_index: Option<usize>,
    },
    Pause,
    Resume,
    Stop,
    Seek {
        index: usize,
    },
    SetSpeed {
        speed: f32,
    },
    SetVoice {
        voice_id: Option<String>,
    },
    Load {
        chunks: Vec<Chunk>,
    },
    DismissNotice,
}

/// Discrete input consumed by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started { generation: u64, index: usize },
    Completed { generation: u64, index: usize },
    Errored { generation: u64, index: usize, message: String },
    Intent(UserIntent),
}

impl From<UserIntent> for PlaybackEvent {
    fn from(intent: UserIntent) -> Self {
        PlaybackEvent::Intent(intent)
    }
}

impl From<SynthesisSignal> for PlaybackEvent {
    fn from(signal: SynthesisSignal) -> Self {
        match signal {
            SynthesisSignal::Start { generation, index } => {
                PlaybackEvent::Started { generation, index }
            }
            SynthesisSignal::End { generation, index } => {
                PlaybackEvent::Completed { generation, index }
            }
            SynthesisSignal::Error {
                generation,
                index,
                message,
            } => PlaybackEvent::Errored {
                generation,
                index,
                message: message.unwrap_or_else(|| "speech synthesis failed".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Outstanding {
    handle: RequestHandle,
}

pub struct PlaybackController<A: SynthesisAdapter> {
    adapter: A,
    store: ChunkStore,
    current_index: usize,
    status: PlaybackStatus,
    speed: f32,
    voice_id: Option<String>,
    generation: u64,
    outstanding: Option<Outstanding>,
    notice: Option<Notice>,
    queue: VecDeque<PlaybackEvent>,
}

impl<A: SynthesisAdapter> PlaybackController<A> {
    pub fn new(adapter: A, speed: f32, voice_id: Option<String>) -> Self {
        Self {
            adapter,
            store: ChunkStore::default(),
            current_index: 0,
            status: PlaybackStatus::Idle,
            speed,
            voice_id,
            generation: 0,
            outstanding: None,
            notice: None,
            queue: VecDeque::new(),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Process one event, then everything it queued behind itself
    pub fn handle(&mut self, event: PlaybackEvent) -> Result<(), NarrationError> {
        let result = self.apply(event);
        while let Some(follow_up) = self.queue.pop_front() {
            if let Err(e) = self.apply(follow_up) {
                tracing::warn!(error = %e, "Queued playback event failed");
            }
        }
        result
    }

    pub fn load(&mut self, chunks: Vec<Chunk>) {
        self.run(UserIntent::Load { chunks });
    }

    pub fn play(&mut self, from_index: Option<usize>) {
        self.run(UserIntent::Play { from_index });
    }

    pub fn pause(&mut self) {
        self.run(UserIntent::Pause);
    }

    pub fn resume(&mut self) {
        self.run(UserIntent::Resume);
    }

    pub fn stop(&mut self) {
        self.run(UserIntent::Stop);
    }

    pub fn seek(&mut self, index: usize) {
        self.run(UserIntent::Seek { index });
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), NarrationError> {
        self.handle(UserIntent::SetSpeed { speed }.into())
    }

    pub fn set_voice(&mut self, voice_id: Option<String>) {
        self.run(UserIntent::SetVoice { voice_id });
    }

    fn run(&mut self, intent: UserIntent) {
        if let Err(e) = self.handle(intent.into()) {
            tracing::warn!(error = %e, "Playback intent failed");
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status,
            current_index: self.current_index,
            chunk_count: self.store.len(),
            speed: self.speed,
            voice_id: self.voice_id.clone(),
            generation: self.generation,
            progress_percent: self.store.progress_percent(self.current_index),
            total_estimate: self
                .store
                .total_estimate(self.speed)
                .map(|estimate| estimate.to_string())
                .unwrap_or_else(|| "0 min".to_string()),
            notice: self.notice.clone(),
        }
    }

    fn apply(&mut self, event: PlaybackEvent) -> Result<(), NarrationError> {
        match event {
            PlaybackEvent::Started { generation, index } => {
                if generation == self.generation && index == self.current_index {
                    tracing::debug!(generation, index, "Utterance started");
                }
            }
            PlaybackEvent::Completed { generation, index } => self.on_completed(generation, index),
            PlaybackEvent::Errored {
                generation,
                index,
                message,
            } => self.on_errored(generation, index, message),
            PlaybackEvent::Intent(intent) => return self.on_intent(intent),
        }
        Ok(())
    }

    fn on_intent(&mut self, intent: UserIntent) -> Result<(), NarrationError> {
        match intent {
            UserIntent::Play { from_index } => self.on_play(from_index),
            UserIntent::Pause => self.on_pause(),
            UserIntent::Resume => self.on_resume(),
            UserIntent::Stop => self.on_stop(),
            UserIntent::Seek { index } => self.on_seek(index),
            UserIntent::SetSpeed { speed } => {
                if !speed.is_finite() || speed <= 0.0 {
                    return Err(NarrationError::InvalidSpeed(speed));
                }
                self.speed = speed;
                self.restart_if_playing();
            }
            UserIntent::SetVoice { voice_id } => {
                self.voice_id = voice_id;
                self.restart_if_playing();
            }
            UserIntent::Load { chunks } => self.on_load(chunks),
            UserIntent::DismissNotice => self.notice = None,
        }
        Ok(())
    }

    fn on_play(&mut self, from_index: Option<usize>) {
        if self.store.is_empty() {
            tracing::debug!("Play ignored, no chunks loaded");
            return;
        }
        self.invalidate();
        let last = self.store.len() - 1;
        self.current_index = from_index.unwrap_or(self.current_index).min(last);
        self.status = PlaybackStatus::Playing;
        self.notice = None;
        self.issue();
    }

    fn on_pause(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        self.adapter.pause_active();
        self.status = PlaybackStatus::Paused;
    }

    fn on_resume(&mut self) {
        if self.status != PlaybackStatus::Paused {
            return;
        }
        self.status = PlaybackStatus::Playing;
        if self.outstanding.is_some() {
            self.adapter.resume_active();
        } else {
            // The suspended request was canceled (seek) or already resolved,
            // so there is nothing left to resume. Signals for the resolved one
            // must not match the replacement.
            self.invalidate();
            self.issue();
        }
    }

    fn on_stop(&mut self) {
        self.invalidate();
        self.status = PlaybackStatus::Idle;
        self.current_index = 0;
    }

    fn on_seek(&mut self, index: usize) {
        if index >= self.store.len() {
            tracing::debug!(index, chunk_count = self.store.len(), "Seek out of range ignored");
            return;
        }
        self.invalidate();
        self.current_index = index;
        if self.status == PlaybackStatus::Playing {
            self.issue();
        }
    }

    fn on_load(&mut self, chunks: Vec<Chunk>) {
        self.invalidate();
        self.store = ChunkStore::new(chunks);
        self.status = PlaybackStatus::Idle;
        self.current_index = 0;
        self.notice = None;
    }

    fn on_completed(&mut self, generation: u64, index: usize) {
        if generation != self.generation || index != self.current_index {
            tracing::debug!(
                generation,
                index,
                current_generation = self.generation,
                "Stale completion discarded"
            );
            return;
        }
        match self.status {
            PlaybackStatus::Playing => {}
            PlaybackStatus::Paused => {
                // The request is gone; resume() will have to issue a new one.
                self.settle();
                return;
            }
            PlaybackStatus::Idle => return,
        }

        self.settle();
        if self.current_index + 1 < self.store.len() {
            self.current_index += 1;
            self.issue();
        } else {
            tracing::info!(generation, chunk_count = self.store.len(), "Narration finished");
            self.status = PlaybackStatus::Idle;
            self.current_index = 0;
        }
    }

    fn on_errored(&mut self, generation: u64, index: usize, message: String) {
        if generation != self.generation
            || index != self.current_index
            || self.status == PlaybackStatus::Idle
        {
            tracing::debug!(
                generation,
                index,
                current_generation = self.generation,
                "Stale error discarded"
            );
            return;
        }
        tracing::warn!(
            generation,
            index = self.current_index,
            error = %message,
            "Speech synthesis failed, playback aborted"
        );
        self.settle();
        self.status = PlaybackStatus::Idle;
        self.notice = Some(Notice {
            message,
            chunk_index: self.current_index,
            generation,
        });
    }

    fn restart_if_playing(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.invalidate();
            self.issue();
        }
    }

    /// Forget the outstanding request once the adapter has reported its outcome
    fn settle(&mut self) {
        if let Some(outstanding) = self.outstanding.take() {
            self.adapter.release(outstanding.handle);
        }
    }

    /// Bump the generation and cancel whatever request belonged to the old one
    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(outstanding) = self.outstanding.take() {
            self.adapter.cancel(outstanding.handle);
        }
    }

    fn issue(&mut self) {
        let Some(chunk) = self.store.get(self.current_index) else {
            self.status = PlaybackStatus::Idle;
            self.current_index = 0;
            return;
        };
        let request = SynthesisRequest {
            generation: self.generation,
            index: self.current_index,
            text: chunk.text.clone(),
            rate: self.speed,
            voice_id: self.voice_id.clone(),
        };
        match self.adapter.speak(request) {
            Ok(handle) => {
                self.outstanding = Some(Outstanding { handle });
            }
            Err(SpeakRejected(message)) => {
                self.outstanding = None;
                self.queue.push_back(PlaybackEvent::Errored {
                    generation: self.generation,
                    index: self.current_index,
                    message,
                });
            }
        }
    }
}
