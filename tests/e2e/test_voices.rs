use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_start_with_empty_catalog(ctx: &TestContext) {
    let response = ctx.client.get("/api/voices").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["voices"], json!([]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_english_voices_and_mark_default(ctx: &TestContext) {
    let response = ctx
        .client
        .put("/api/voices", &ctx.fixtures.platform_voices())
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let voices = response.body.as_ref().unwrap()["voices"].as_array().unwrap().clone();
    assert_eq!(voices.len(), 3);

    let ids: Vec<&str> = voices.iter().map(|v| v["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["urn:alex", "urn:google-uk", "urn:ms-zira"]);

    let defaults: Vec<&str> = voices
        .iter()
        .filter(|v| v["default"] == true)
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(defaults, vec!["urn:google-uk"]);

    assert_eq!(voices[1]["display_name"], "UK English Female");
    assert_eq!(voices[2]["display_name"], "Zira");

    // Listing returns the same catalog
    let listed = ctx.client.get("/api/voices").await.unwrap();
    assert_eq!(listed.body.as_ref().unwrap()["voices"].as_array().unwrap().len(), 3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_voice_without_id(ctx: &TestContext) {
    let response = ctx
        .client
        .put(
            "/api/voices",
            &json!({ "voices": [{ "id": " ", "name": "Nameless", "lang": "en-US" }] }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Voice id cannot be empty");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_default_voice_for_new_sessions(ctx: &TestContext) {
    ctx.client
        .put("/api/voices", &ctx.fixtures.platform_voices())
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let session_id = ctx.create_session(6).await;
    let session = ctx
        .client
        .get(&format!("/api/sessions/{}", session_id))
        .await
        .unwrap();

    assert_eq!(session.body.as_ref().unwrap()["voice_id"], "urn:google-uk");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_switch_voice_and_restart_current_chunk(ctx: &TestContext) {
    ctx.client
        .put("/api/voices", &ctx.fixtures.platform_voices())
        .await
        .unwrap();
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({ "from_index": 1 })).await;
    let before = ctx.directive(&session_id).await["utterance"].clone();

    let body = ctx
        .command(&session_id, "voice", json!({ "voice_id": "urn:alex" }))
        .await;
    assert_eq!(body["voice_id"], "urn:alex");

    let after = ctx.directive(&session_id).await["utterance"].clone();
    assert_eq!(after["index"], 1);
    assert_eq!(after["voice_id"], "urn:alex");
    assert!(after["generation"].as_u64() > before["generation"].as_u64());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_default_for_unknown_voice(ctx: &TestContext) {
    ctx.client
        .put("/api/voices", &ctx.fixtures.platform_voices())
        .await
        .unwrap();
    let session_id = ctx.create_session(6).await;

    // French voices are filtered out of the catalog
    let body = ctx
        .command(&session_id, "voice", json!({ "voice_id": "urn:thomas" }))
        .await;

    assert_eq!(body["voice_id"], "urn:google-uk");
}
