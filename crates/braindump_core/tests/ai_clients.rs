use braindump_core::ai::nudge::{ALL_CAUGHT_UP_MESSAGE, EMPTY_RESPONSE_MESSAGE};
use braindump_core::config::AiSettings;
use braindump_core::{
    AiError, Categorizer, GeminiClient, GenerateRequest, Item, ItemType, NudgeBoard,
    NudgeClient, Priority, TextModel,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

fn settings(server: &MockServer, api_key: Option<&str>) -> AiSettings {
    AiSettings {
        api_key: api_key.map(str::to_string),
        model: "test-model".to_string(),
        base_url: format!("{}/", server.uri()),
        timeout_secs: 5,
    }
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

fn task(title: &str, completed: bool) -> Item {
    let mut item = Item::new(ItemType::Task, title, title, "Work", 1);
    item.completed = completed;
    item
}

#[tokio::test]
async fn gemini_sends_key_header_and_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "secret-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(text_response(
            r#"{"title":"Book dentist","type":"task","category":"Health","tags":["teeth"],"priority":"medium"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings(&server, Some("secret-key"))).unwrap();
    let categorizer = Categorizer::new(Arc::new(client));
    let result = categorizer
        .categorize("need to book the dentist", None)
        .await
        .unwrap();

    assert_eq!(result.title, "Book dentist");
    assert_eq!(result.kind, ItemType::Task);
    assert_eq!(result.priority, Some(Priority::Medium));
}

#[tokio::test]
async fn gemini_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings(&server, Some("key"))).unwrap();
    let err = client
        .generate(&GenerateRequest::text("hi"))
        .await
        .unwrap_err();
    match err {
        AiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "backend exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn gemini_without_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings(&server, Some("  "))).unwrap();
    assert!(!client.is_configured());
    let err = client
        .generate(&GenerateRequest::text("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::MissingApiKey));
}

#[tokio::test]
async fn gemini_blank_candidate_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings(&server, Some("key"))).unwrap();
    let err = client
        .generate(&GenerateRequest::text("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::EmptyResponse));
}

#[tokio::test]
async fn nudge_with_no_pending_tasks_skips_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings(&server, Some("key"))).unwrap();
    let nudges = NudgeClient::new(Arc::new(client));
    let items = vec![task("done already", true)];

    let message = nudges.generate(&items, None).await.unwrap();
    assert_eq!(message, ALL_CAUGHT_UP_MESSAGE);
}

#[tokio::test]
async fn nudge_prompt_lists_pending_titles_and_caps_words() {
    let server = MockServer::start().await;
    let long_reply = "breathe ".repeat(40);
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(text_response(&long_reply))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings(&server, Some("key"))).unwrap();
    let nudges = NudgeClient::new(Arc::new(client));
    let items = vec![task("Pay rent", false), task("Old chore", true)];

    let message = nudges.generate(&items, Some("night shifts")).await.unwrap();
    assert_eq!(message.split_whitespace().count(), 25);
    assert!(message.ends_with("..."));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Pay rent"));
    assert!(!prompt.contains("Old chore"));
    assert!(prompt.contains("night shifts"));
    assert!(body.get("generationConfig").is_none());
}

#[tokio::test]
async fn nudge_board_uses_fallback_text_on_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&settings(&server, Some("key"))).unwrap();
    let nudges = NudgeClient::new(Arc::new(client));
    let mut board = NudgeBoard::default();

    assert!(board.refresh(&nudges, &[task("Water plants", false)], None).await);
    assert_eq!(board.message(), EMPTY_RESPONSE_MESSAGE);
    assert!(!board.is_loading());
}
