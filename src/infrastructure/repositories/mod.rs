pub mod http_learning_repository;
pub mod learning_repository;
pub mod openai_tts_repository;
pub mod tts_repository;

pub use http_learning_repository::HttpLearningRepository;
pub use learning_repository::LearningRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use tts_repository::{SpeechParams, TtsRepository};
