pub mod catalog;

pub use catalog::{Voice, VoiceCatalog, VoiceResponse};
use serde::{Deserialize, Serialize};

/// Request for PUT /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaceVoicesRequest {
    pub voices: Vec<Voice>,
}

/// Response for GET /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceResponse>,
}
