use crate::error::AppError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("narration session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("document not found: {0}")]
    DocumentNotFound(String),
    #[error("narration session {0} is closed")]
    SessionClosed(Uuid),
    #[error("invalid speed: {0} (must be a positive number)")]
    InvalidSpeed(f32),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("document is too short for read aloud ({sentences} sentences, need at least {required})")]
    DocumentTooShort { sentences: usize, required: usize },
    #[error("summary came back empty")]
    EmptySummary,
    #[error("no utterance is outstanding")]
    NoUtterance,
    #[error("speech synthesis is not available on this host")]
    AdapterUnavailable,
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<NarrationError> for AppError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::SessionNotFound(_)
            | NarrationError::SessionClosed(_)
            | NarrationError::DocumentNotFound(_)
            | NarrationError::NoUtterance => AppError::NotFound(err.to_string()),
            NarrationError::InvalidSpeed(_) | NarrationError::Invalid(_) => {
                AppError::BadRequest(err.to_string())
            }
            NarrationError::DocumentTooShort { .. } | NarrationError::EmptySummary => {
                AppError::Unprocessable(err.to_string())
            }
            NarrationError::AdapterUnavailable => AppError::ServiceUnavailable(err.to_string()),
            NarrationError::Dependency(msg) => AppError::ExternalService(msg),
        }
    }
}
