pub mod health;
pub mod narration;
pub mod speech;
pub mod voices;
