use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    domain::{
        narration::{NarrationError, NarrationService, NarrationServiceApi, PlaybackSnapshot, SynthesisSignal},
        tts::{SpeechRenderApi, SpeechRenderService},
    },
    error::{AppError, AppResult},
    infrastructure::speech::DeviceDirective,
};

/// Longest a device may hold an utterance poll open
const MAX_WAIT_MS: u64 = 30_000;

/// Query for GET /api/sessions/{sessionId}/utterance
#[derive(Debug, Default, Deserialize)]
pub struct UtteranceQuery {
    /// Last directive sequence the device has seen
    pub since: Option<u64>,
    pub wait_ms: Option<u64>,
}

/// Response for POST /api/sessions/{sessionId}/signals
#[derive(Debug, Serialize, Deserialize)]
pub struct SignalAccepted {
    pub accepted: bool,
    pub playback: PlaybackSnapshot,
}

pub struct SpeechController {
    narration_service: Arc<NarrationService>,
    render_service: Arc<SpeechRenderService>,
}

impl SpeechController {
    pub fn new(narration_service: Arc<NarrationService>, render_service: Arc<SpeechRenderService>) -> Self {
        Self {
            narration_service,
            render_service,
        }
    }

    /// GET /api/sessions/{sessionId}/utterance - What the device should be saying.
    /// With `since`, waits up to `wait_ms` for a directive newer than that sequence.
    pub async fn get_utterance(
        State(controller): State<Arc<SpeechController>>,
        Path(session_id): Path<Uuid>,
        Query(query): Query<UtteranceQuery>,
    ) -> AppResult<Json<DeviceDirective>> {
        let session = controller.narration_service.get_session(session_id).await?;

        let directive = match query.since {
            Some(since) => {
                let wait = Duration::from_millis(query.wait_ms.unwrap_or(0).min(MAX_WAIT_MS));
                session.device.next_after(since, wait).await
            }
            None => session.device.current(),
        };
        Ok(Json(directive))
    }

    /// POST /api/sessions/{sessionId}/signals - Start/end/error reported by the device
    pub async fn report_signal(
        State(controller): State<Arc<SpeechController>>,
        Path(session_id): Path<Uuid>,
        Json(signal): Json<SynthesisSignal>,
    ) -> AppResult<(StatusCode, Json<SignalAccepted>)> {
        let playback = controller
            .narration_service
            .report_signal(session_id, signal)
            .await?;
        Ok((
            StatusCode::ACCEPTED,
            Json(SignalAccepted {
                accepted: true,
                playback,
            }),
        ))
    }

    /// GET /api/sessions/{sessionId}/utterance/audio - Outstanding utterance rendered to MP3
    pub async fn get_utterance_audio(
        State(controller): State<Arc<SpeechController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        if !controller.render_service.is_available() {
            return Err(NarrationError::AdapterUnavailable.into());
        }

        let session = controller.narration_service.get_session(session_id).await?;
        let utterance = session
            .device
            .current()
            .utterance
            .ok_or(NarrationError::NoUtterance)?;

        let rendered = controller.render_service.render(&utterance).await?;
        let duration_seconds = (rendered.duration_minutes * 60.0).round() as u64;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
        headers.insert("X-Generation", header_value(utterance.generation)?);
        headers.insert("X-Chunk-Index", header_value(utterance.index)?);
        headers.insert("X-Request-Handle", header_value(utterance.request_id.0)?);
        headers.insert("X-Duration-Seconds", header_value(duration_seconds)?);
        headers.insert("X-Character-Count", header_value(rendered.char_count)?);

        Ok((StatusCode::OK, headers, Body::from(rendered.audio_data)))
    }
}

fn header_value(value: impl ToString) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&value.to_string())
        .map_err(|e| AppError::Internal(format!("Invalid header value: {}", e)))
}
