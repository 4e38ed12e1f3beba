use crate::domain::narration::NarrationError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechRenderError {
    #[error("speech synthesis is not available on this host")]
    Unavailable,
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl From<SpeechRenderError> for AppError {
    fn from(err: SpeechRenderError) -> Self {
        match err {
            SpeechRenderError::Unavailable => {
                AppError::from(NarrationError::AdapterUnavailable)
            }
            SpeechRenderError::Dependency(msg) => AppError::ExternalService(msg),
            SpeechRenderError::Invalid(msg) => AppError::BadRequest(msg),
        }
    }
}
