use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::voice::{ReplaceVoicesRequest, VoiceCatalog, VoicesResponse},
    error::{AppError, AppResult},
};

pub struct VoiceController {
    voices: Arc<VoiceCatalog>,
}

impl VoiceController {
    pub fn new(voices: Arc<VoiceCatalog>) -> Self {
        Self { voices }
    }

    /// GET /api/voices - English voices offered by the speaking device
    pub async fn list_voices(
        State(controller): State<Arc<VoiceController>>,
    ) -> AppResult<Json<VoicesResponse>> {
        Ok(Json(VoicesResponse {
            voices: controller.voices.responses(),
        }))
    }

    /// PUT /api/voices - Device reports its full voice list
    pub async fn replace_voices(
        State(controller): State<Arc<VoiceController>>,
        Json(request): Json<ReplaceVoicesRequest>,
    ) -> AppResult<Json<VoicesResponse>> {
        if request.voices.iter().any(|voice| voice.id.trim().is_empty()) {
            return Err(AppError::BadRequest("Voice id cannot be empty".to_string()));
        }

        controller.voices.replace(request.voices);
        Ok(Json(VoicesResponse {
            voices: controller.voices.responses(),
        }))
    }
}
