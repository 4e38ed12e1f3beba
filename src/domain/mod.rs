pub mod document;
pub mod narration;
pub mod tts;
pub mod voice;
