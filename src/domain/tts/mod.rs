pub mod error;
pub mod service;

pub use error::SpeechRenderError;
pub use service::{RenderedSpeech, SpeechRenderApi, SpeechRenderService};
