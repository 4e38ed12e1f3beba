use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_idle_session_for_document(ctx: &TestContext) {
    ctx.fixtures.create_document("doc-biology", 6);

    let response = ctx
        .client
        .post_empty("/api/documents/doc-biology/read-aloud")
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let body = response.body.as_ref().unwrap();
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["status"], "idle");
    assert_eq!(body["current_index"], 0);
    assert_eq!(body["chunk_count"], 3);
    assert_eq!(body["speed"], 1.0);
    assert_eq!(body["source"], json!({ "kind": "document", "document_id": "doc-biology" }));
    assert!(body.get("notice").is_none());

    // The configured chunk count is what the chunker is asked for
    assert_eq!(ctx.learning.requested_cluster_counts(), vec![8]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_documents_that_are_too_short(ctx: &TestContext) {
    ctx.fixtures.create_document("doc-short", 4);

    let response = ctx
        .client
        .post_empty("/api/documents/doc-short/read-aloud")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("too short");
    assert!(ctx.learning.requested_cluster_counts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_document(ctx: &TestContext) {
    let response = ctx
        .client
        .post_empty("/api/documents/does-not-exist/read-aloud")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("document not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_chunks_with_estimates(ctx: &TestContext) {
    let session_id = ctx.create_session(5).await;

    let response = ctx
        .client
        .get(&format!("/api/sessions/{}/chunks", session_id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    let chunks = body["chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 3);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk["order"], i);
        assert_eq!(chunk["estimate"], "~1 min");
    }
    assert_eq!(chunks[2]["sentence_count"], 1);
    assert_eq!(
        chunks[0]["text"],
        "This is sentence number 1 of the test document. This is sentence number 2 of the test document."
    );
    assert_eq!(body["current_index"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_progress_and_total_estimate(ctx: &TestContext) {
    let session_id = ctx.create_session(8).await;

    let body = ctx
        .command(&session_id, "play", json!({ "from_index": 1 }))
        .await;

    assert_eq!(body["status"], "playing");
    assert_eq!(body["current_index"], 1);
    assert_eq!(body["progress_percent"], 50.0);
    assert_eq!(body["total_estimate"], "~1 min");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_session(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/api/sessions/00000000-0000-0000-0000-000000000000")
        .await
        .unwrap();
    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("session not found");

    let response = ctx
        .client
        .post_empty("/api/sessions/00000000-0000-0000-0000-000000000000/play")
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_session_id(ctx: &TestContext) {
    let response = ctx.client.get("/api/sessions/not-a-uuid").await.unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_close_session(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    ctx.command(&session_id, "play", json!({})).await;

    let response = ctx
        .client
        .delete(&format!("/api/sessions/{}", session_id))
        .await
        .unwrap();
    response.assert_status(StatusCode::NO_CONTENT);

    let response = ctx
        .client
        .get(&format!("/api/sessions/{}", session_id))
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);

    let response = ctx
        .client
        .delete(&format!("/api/sessions/{}", session_id))
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reload_session_from_scratch(ctx: &TestContext) {
    let session_id = ctx.create_session(6).await;
    let playing = ctx
        .command(&session_id, "play", json!({ "from_index": 2 }))
        .await;
    assert_eq!(playing["status"], "playing");

    let reloaded = ctx.command(&session_id, "reload", json!({})).await;

    assert_eq!(reloaded["status"], "idle");
    assert_eq!(reloaded["current_index"], 0);
    assert_eq!(reloaded["chunk_count"], 3);
    assert!(reloaded["generation"].as_u64() > playing["generation"].as_u64());
    assert_eq!(ctx.learning.requested_cluster_counts(), vec![8, 8]);

    // Nothing left for the device to say
    let directive = ctx.directive(&session_id).await;
    assert!(directive.get("utterance").is_none());
}
