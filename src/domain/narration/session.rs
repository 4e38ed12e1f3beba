use super::adapter::SynthesisAdapter;
use super::controller::{PlaybackController, PlaybackEvent};
use super::error::NarrationError;
use super::model::{Chunk, PlaybackSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

const COMMAND_BUFFER: usize = 64;

/// Where a session's chunks come from, so they can be fetched again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionSource {
    Document {
        document_id: String,
    },
    Summary {
        document_id: String,
        summary_type: crate::domain::document::SummaryType,
        max_length: u32,
    },
}

/// Latest published state of a session
#[derive(Debug, Clone)]
pub struct SessionView {
    pub snapshot: PlaybackSnapshot,
    pub chunks: Arc<[Chunk]>,
}

impl SessionView {
    fn capture<A: SynthesisAdapter>(controller: &PlaybackController<A>) -> Self {
        Self {
            snapshot: controller.snapshot(),
            chunks: controller.store().shared(),
        }
    }
}

struct SessionCommand {
    event: PlaybackEvent,
    reply: Option<oneshot::Sender<Result<PlaybackSnapshot, NarrationError>>>,
}

/// Cloneable handle to one running narration session.
///
/// The session task exclusively owns its controller and adapter; handles only
/// send events into its queue and read what it publishes. The task ends once
/// every handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    source: SessionSource,
    created_at: DateTime<Utc>,
    commands: mpsc::Sender<SessionCommand>,
    view: watch::Receiver<SessionView>,
}

impl SessionHandle {
    /// Spawn the session task on the current tokio runtime
    pub fn spawn<A>(source: SessionSource, mut controller: PlaybackController<A>, chunks: Vec<Chunk>) -> Self
    where
        A: SynthesisAdapter + 'static,
    {
        let id = Uuid::new_v4();
        controller.load(chunks);

        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view) = watch::channel(SessionView::capture(&controller));

        tokio::spawn(run_session(id, controller, receiver, view_tx));

        tracing::info!(session_id = %id, source = ?source, "Narration session started");

        Self {
            id,
            source,
            created_at: Utc::now(),
            commands,
            view,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &SessionSource {
        &self.source
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.view.borrow().snapshot.clone()
    }

    /// Queue an event and wait until the session has processed it
    pub async fn send(&self, event: impl Into<PlaybackEvent>) -> Result<PlaybackSnapshot, NarrationError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(SessionCommand {
                event: event.into(),
                reply: Some(reply),
            })
            .await
            .map_err(|_| NarrationError::SessionClosed(self.id))?;
        response
            .await
            .map_err(|_| NarrationError::SessionClosed(self.id))?
    }

    /// Queue an event without waiting for it
    pub async fn post(&self, event: impl Into<PlaybackEvent>) -> Result<(), NarrationError> {
        self.commands
            .send(SessionCommand {
                event: event.into(),
                reply: None,
            })
            .await
            .map_err(|_| NarrationError::SessionClosed(self.id))
    }
}

async fn run_session<A: SynthesisAdapter>(
    id: Uuid,
    mut controller: PlaybackController<A>,
    mut commands: mpsc::Receiver<SessionCommand>,
    view: watch::Sender<SessionView>,
) {
    while let Some(SessionCommand { event, reply }) = commands.recv().await {
        tracing::trace!(session_id = %id, event = ?event, "Processing playback event");

        let result = controller.handle(event);
        let captured = SessionView::capture(&controller);
        let snapshot = captured.snapshot.clone();
        view.send_replace(captured);

        if let Some(reply) = reply {
            // The caller may have given up waiting; the transition still stands.
            let _ = reply.send(result.map(|_| snapshot));
        } else if let Err(e) = result {
            tracing::warn!(session_id = %id, error = %e, "Playback event rejected");
        }
    }

    controller.stop();
    tracing::info!(session_id = %id, "Narration session closed");
}
