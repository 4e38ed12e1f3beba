use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        document::SummaryReadAloudRequest,
        narration::{
            ChunksResponse, NarrationService, NarrationServiceApi, PlayRequest, PlaybackSnapshot,
            SeekRequest, SessionResponse, SpeedRequest, UserIntent, VoiceRequest,
        },
    },
    error::AppResult,
};

pub struct NarrationController {
    narration_service: Arc<NarrationService>,
}

impl NarrationController {
    pub fn new(narration_service: Arc<NarrationService>) -> Self {
        Self { narration_service }
    }

    /// POST /api/documents/{documentId}/read-aloud - Open a session over a document
    pub async fn start_read_aloud(
        State(controller): State<Arc<NarrationController>>,
        Path(document_id): Path<String>,
    ) -> AppResult<(StatusCode, Json<SessionResponse>)> {
        let session = controller
            .narration_service
            .start_document_session(&document_id)
            .await?;
        Ok((StatusCode::CREATED, Json(SessionResponse::from(&session.handle))))
    }

    /// POST /api/documents/{documentId}/summary-read-aloud - Open a session over a summary
    pub async fn start_summary_read_aloud(
        State(controller): State<Arc<NarrationController>>,
        Path(document_id): Path<String>,
        Json(request): Json<SummaryReadAloudRequest>,
    ) -> AppResult<(StatusCode, Json<SessionResponse>)> {
        let session = controller
            .narration_service
            .start_summary_session(&document_id, request.summary_type, request.max_length)
            .await?;
        Ok((StatusCode::CREATED, Json(SessionResponse::from(&session.handle))))
    }

    /// GET /api/sessions/{sessionId} - Current playback state
    pub async fn get_session(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        let session = controller.narration_service.get_session(session_id).await?;
        Ok(Json(SessionResponse::from(&session.handle)))
    }

    /// GET /api/sessions/{sessionId}/chunks - Chunks with duration estimates
    pub async fn list_chunks(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<ChunksResponse>> {
        let session = controller.narration_service.get_session(session_id).await?;
        Ok(Json(ChunksResponse::from(session.handle.view())))
    }

    /// DELETE /api/sessions/{sessionId} - Stop and drop a session
    pub async fn close_session(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller.narration_service.close(session_id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// POST /api/sessions/{sessionId}/reload - Fetch chunks again and start over
    pub async fn reload(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        let snapshot = controller.narration_service.reload(session_id).await?;
        controller.respond(session_id, snapshot).await
    }

    /// POST /api/sessions/{sessionId}/play
    pub async fn play(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
        request: Option<Json<PlayRequest>>,
    ) -> AppResult<Json<SessionResponse>> {
        let Json(request) = request.unwrap_or_default();
        controller
            .apply(session_id, UserIntent::Play { from_index: request.from_index })
            .await
    }

    /// POST /api/sessions/{sessionId}/pause
    pub async fn pause(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        controller.apply(session_id, UserIntent::Pause).await
    }

    /// POST /api/sessions/{sessionId}/resume
    pub async fn resume(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        controller.apply(session_id, UserIntent::Resume).await
    }

    /// POST /api/sessions/{sessionId}/stop
    pub async fn stop(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        controller.apply(session_id, UserIntent::Stop).await
    }

    /// POST /api/sessions/{sessionId}/seek
    pub async fn seek(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<SeekRequest>,
    ) -> AppResult<Json<SessionResponse>> {
        controller
            .apply(session_id, UserIntent::Seek { index: request.index })
            .await
    }

    /// POST /api/sessions/{sessionId}/speed
    pub async fn set_speed(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<SpeedRequest>,
    ) -> AppResult<Json<SessionResponse>> {
        controller
            .apply(session_id, UserIntent::SetSpeed { speed: request.speed })
            .await
    }

    /// POST /api/sessions/{sessionId}/voice
    pub async fn set_voice(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<VoiceRequest>,
    ) -> AppResult<Json<SessionResponse>> {
        let snapshot = controller
            .narration_service
            .set_voice(session_id, request.voice_id)
            .await?;
        controller.respond(session_id, snapshot).await
    }

    /// POST /api/sessions/{sessionId}/notice/dismiss
    pub async fn dismiss_notice(
        State(controller): State<Arc<NarrationController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        controller.apply(session_id, UserIntent::DismissNotice).await
    }

    async fn apply(&self, session_id: Uuid, intent: UserIntent) -> AppResult<Json<SessionResponse>> {
        let snapshot = self.narration_service.dispatch(session_id, intent).await?;
        self.respond(session_id, snapshot).await
    }

    async fn respond(&self, session_id: Uuid, snapshot: PlaybackSnapshot) -> AppResult<Json<SessionResponse>> {
        let session = self.narration_service.get_session(session_id).await?;
        Ok(Json(SessionResponse::new(&session.handle, snapshot)))
    }
}
