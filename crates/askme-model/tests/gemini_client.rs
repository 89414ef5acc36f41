//! Gemini client integration tests against a `wiremock` mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use askme_core::{AskMeError, Message, Role};
use askme_model::{GeminiClient, ModelClient, ModelConfig};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> ModelConfig {
    ModelConfig {
        api_key: "test-key".to_string(),
        model_id: "models/gemini-2.5-flash".to_string(),
        api_base_url: Some(base_url.to_string()),
        max_context_messages: 6,
    }
}

fn generate_content_path() -> &'static str {
    "/v1beta/models/gemini-2.5-flash:generateContent"
}

#[tokio::test]
async fn generate_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_content_path()))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Rust is a systems language." }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server.uri())).unwrap();
    let reply = client.generate("what is rust?", &[]).await.unwrap();
    assert_eq!(reply, "Rust is a systems language.");
}

#[tokio::test]
async fn generate_folds_history_into_the_prompt() {
    let server = MockServer::start().await;
    // The prompt is a single text part; assert it carries the prior turns.
    Mock::given(method("POST"))
        .and(path(generate_content_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "ok" }] }
            }]
        })))
        .mount(&server)
        .await;

    let history = vec![
        Message::new(0, Role::User, "hello", chrono::Utc::now()),
        Message::new(1, Role::Assistant, "hi", chrono::Utc::now()),
    ];
    let client = GeminiClient::new(test_config(&server.uri())).unwrap();
    client.generate("next question", &history).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("User: hello"));
    assert!(prompt.contains("Assistant: hi"));
    assert!(prompt.ends_with("User: next question"));
}

#[tokio::test]
async fn api_error_status_surfaces_as_model_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_content_path()))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "message": "quota exceeded" }
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server.uri())).unwrap();
    let err = client.generate("hello", &[]).await.unwrap_err();
    assert!(matches!(err, AskMeError::Model(_)));
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn empty_candidates_surface_as_model_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_content_path()))
        .and(body_partial_json(serde_json::json!({
            "contents": [{ "parts": [{}] }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::new(test_config(&server.uri())).unwrap();
    let err = client.generate("hello", &[]).await.unwrap_err();
    assert!(matches!(err, AskMeError::Model(_)));
}
