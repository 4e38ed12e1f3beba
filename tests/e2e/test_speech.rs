use crate::e2e::helpers;

use helpers::{NoSpeechContext, TestContext, FAKE_AUDIO_PREFIX};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_narrate_every_chunk_in_order(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;

    let body = ctx.command(&session_id, "play", json!({})).await;
    assert_eq!(body["status"], "playing");

    let mut spoken = Vec::new();
    for _ in 0..3 {
        let directive = ctx.directive(&session_id).await;
        spoken.push(directive["utterance"]["index"].as_u64().unwrap());
        ctx.finish_current_utterance(&session_id).await;
    }

    assert_eq!(spoken, vec![0, 1, 2]);
    let session = ctx
        .client
        .get(&format!("/api/sessions/{}", session_id))
        .await
        .unwrap();
    let body = session.body.as_ref().unwrap();
    assert_eq!(body["status"], "idle");
    assert_eq!(body["current_index"], 0);
    assert!(ctx.directive(&session_id).await.get("utterance").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_publish_utterance_with_rate_and_generation(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    let body = ctx
        .command(&session_id, "play", json!({ "from_index": 1 }))
        .await;

    let directive = ctx.directive(&session_id).await;
    let utterance = &directive["utterance"];
    assert_eq!(directive["paused"], false);
    assert_eq!(utterance["index"], 1);
    assert_eq!(utterance["generation"], body["generation"]);
    assert_eq!(utterance["rate"], 1.0);
    assert_eq!(
        utterance["text"],
        "This is sentence number 3 of the test document. This is sentence number 4 of the test document."
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pause_and_resume_without_new_request(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({})).await;
    let before = ctx.directive(&session_id).await;

    let paused = ctx.command(&session_id, "pause", json!({})).await;
    assert_eq!(paused["status"], "paused");
    assert_eq!(ctx.directive(&session_id).await["paused"], true);

    let resumed = ctx.command(&session_id, "resume", json!({})).await;
    assert_eq!(resumed["status"], "playing");
    assert_eq!(resumed["current_index"], 0);

    let after = ctx.directive(&session_id).await;
    assert_eq!(after["paused"], false);
    assert_eq!(after["utterance"]["request_id"], before["utterance"]["request_id"]);
    assert_eq!(after["utterance"]["generation"], before["utterance"]["generation"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ignore_signals_from_before_a_seek(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({})).await;
    let stale = ctx.directive(&session_id).await["utterance"].clone();

    let seeked = ctx.command(&session_id, "seek", json!({ "index": 2 })).await;
    assert_eq!(seeked["current_index"], 2);
    assert_eq!(seeked["status"], "playing");

    // The old request finishing late must not advance playback
    let snapshot = ctx
        .signal(
            &session_id,
            "end",
            stale["generation"].as_u64().unwrap(),
            stale["index"].as_u64().unwrap(),
        )
        .await;
    assert_eq!(snapshot["current_index"], 2);
    assert_eq!(snapshot["status"], "playing");

    let directive = ctx.directive(&session_id).await;
    assert_eq!(directive["utterance"]["index"], 2);
    assert_ne!(directive["utterance"]["generation"], stale["generation"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ignore_seek_out_of_range(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    let playing = ctx.command(&session_id, "play", json!({})).await;

    let body = ctx.command(&session_id, "seek", json!({ "index": 99 })).await;

    assert_eq!(body["current_index"], 0);
    assert_eq!(body["generation"], playing["generation"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_restart_chunk_when_speed_changes(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({ "from_index": 1 })).await;
    let before = ctx.directive(&session_id).await["utterance"].clone();

    let body = ctx.command(&session_id, "speed", json!({ "speed": 1.5 })).await;
    assert_eq!(body["speed"], 1.5);
    assert_eq!(body["current_index"], 1);

    let after = ctx.directive(&session_id).await["utterance"].clone();
    assert_eq!(after["index"], 1);
    assert_eq!(after["rate"], 1.5);
    assert!(after["generation"].as_u64() > before["generation"].as_u64());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_speed(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;

    let response = ctx
        .client
        .post(
            &format!("/api/sessions/{}/speed", session_id),
            &json!({ "speed": 0.0 }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("invalid speed");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stop_and_ignore_late_signals(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({ "from_index": 1 })).await;
    let utterance = ctx.directive(&session_id).await["utterance"].clone();

    let stopped = ctx.command(&session_id, "stop", json!({})).await;
    assert_eq!(stopped["status"], "idle");
    assert_eq!(stopped["current_index"], 0);
    assert!(ctx.directive(&session_id).await.get("utterance").is_none());

    let snapshot = ctx
        .signal(
            &session_id,
            "end",
            utterance["generation"].as_u64().unwrap(),
            utterance["index"].as_u64().unwrap(),
        )
        .await;
    assert_eq!(snapshot["status"], "idle");
    assert_eq!(snapshot["current_index"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_abort_with_notice_on_synthesis_error(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({ "from_index": 1 })).await;
    let utterance = ctx.directive(&session_id).await["utterance"].clone();

    let response = ctx
        .client
        .post(
            &format!("/api/sessions/{}/signals", session_id),
            &json!({
                "kind": "error",
                "generation": utterance["generation"],
                "index": utterance["index"],
                "message": "audio device lost"
            }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::ACCEPTED);

    let playback = &response.body.as_ref().unwrap()["playback"];
    assert_eq!(playback["status"], "idle");
    assert_eq!(playback["current_index"], 1);
    assert_eq!(playback["notice"]["message"], "audio device lost");
    assert_eq!(playback["notice"]["chunk_index"], 1);

    let dismissed = ctx.command(&session_id, "notice/dismiss", json!({})).await;
    assert!(dismissed.get("notice").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_signal(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;

    let response = ctx
        .client
        .post(
            &format!("/api/sessions/{}/signals", session_id),
            &json!({ "kind": "finished", "generation": 1, "index": 0 }),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_long_poll_for_next_directive(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    let initial = ctx.directive(&session_id).await;
    let since = initial["sequence"].as_u64().unwrap();

    let client = ctx.client.clone();
    let path = format!(
        "/api/sessions/{}/utterance?since={}&wait_ms=5000",
        session_id, since
    );
    let poll = tokio::spawn(async move { client.get(&path).await });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    ctx.command(&session_id, "play", json!({})).await;

    let response = poll.await.unwrap().unwrap();
    response.assert_status(StatusCode::OK);
    let directive = response.body.as_ref().unwrap();
    assert!(directive["sequence"].as_u64().unwrap() > since);
    assert_eq!(directive["utterance"]["index"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_current_directive_when_poll_times_out(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    let initial = ctx.directive(&session_id).await;

    let response = ctx
        .client
        .get(&format!(
            "/api/sessions/{}/utterance?since={}&wait_ms=50",
            session_id, initial["sequence"]
        ))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap(), &initial);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_render_outstanding_utterance_audio(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "speed", json!({ "speed": 1.25 })).await;
    let body = ctx
        .command(&session_id, "play", json!({ "from_index": 2 }))
        .await;

    let response = ctx
        .client
        .get(&format!("/api/sessions/{}/utterance/audio", session_id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("content-type", "audio/mpeg");
    response.assert_header("x-chunk-index", "2");
    response.assert_header("x-generation", &body["generation"].to_string());
    response.assert_header_exists("x-duration-seconds");
    assert!(response.body_bytes.starts_with(FAKE_AUDIO_PREFIX));

    let rendered = String::from_utf8_lossy(&response.body_bytes[FAKE_AUDIO_PREFIX.len()..]).to_string();
    assert_eq!(
        rendered,
        "-|1.25|This is sentence number 5 of the test document. This is sentence number 6 of the test document."
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_audio_without_utterance(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;

    let response = ctx
        .client
        .get(&format!("/api/sessions/{}/utterance/audio", session_id))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("no utterance");
}

#[test_context(NoSpeechContext)]
#[tokio::test]
async fn it_should_return_503_for_audio_without_provider(ctx: &NoSpeechContext) {
    let ctx = &ctx.0;
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({})).await;

    let response = ctx
        .client
        .get(&format!("/api/sessions/{}/utterance/audio", session_id))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("not available");

    // Playback itself does not depend on the renderer
    let body = ctx.finish_current_utterance(&session_id).await;
    assert_eq!(body["current_index"], 1);
}
