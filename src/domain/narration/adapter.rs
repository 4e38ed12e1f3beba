use serde::{Deserialize, Serialize};

/// Identity of one issued speak call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestHandle(pub u64);

/// One speak call: a chunk's text plus the rate and voice to speak it with.
///
/// `generation` and `index` are recorded at issue time and come back on every
/// signal the speaking side reports for this request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub generation: u64,
    pub index: usize,
    pub text: String,
    pub rate: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

/// The adapter refused a request before it was ever spoken
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("speech request rejected: {0}")]
pub struct SpeakRejected(pub String);

/// Speech synthesis capability driven by a `PlaybackController`.
///
/// Implementations:
/// - speak one request at a time and deliver exactly one start, end or error
///   signal per non-canceled request, asynchronously
/// - always start a new request unsuspended, even if the previous one was paused
/// - suppress signals for canceled requests where they can (the controller's
///   generation check is the backstop when they cannot)
pub trait SynthesisAdapter: Send {
    fn speak(&mut self, request: SynthesisRequest) -> Result<RequestHandle, SpeakRejected>;

    fn cancel(&mut self, handle: RequestHandle);

    /// Suspend whatever is currently being spoken
    fn pause_active(&mut self);

    /// Continue the suspended request from where it stopped
    fn resume_active(&mut self);

    /// The request reported its end or error and needs no further attention
    fn release(&mut self, _handle: RequestHandle) {}
}

/// Signal reported by the speaking side for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SynthesisSignal {
    Start {
        generation: u64,
        index: usize,
    },
    End {
        generation: u64,
        index: usize,
    },
    Error {
        generation: u64,
        index: usize,
        #[serde(default)]
        message: Option<String>,
    },
}

impl SynthesisSignal {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Start { generation, .. }
            | Self::End { generation, .. }
            | Self::Error { generation, .. } => *generation,
        }
    }
}
