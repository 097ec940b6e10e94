// ABOUTME: HTTP-level tests for the Gemini and DeepSeek providers against mocked APIs
// ABOUTME: Request shape, response parsing, error mapping and adapter retry on transient failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::time::Duration;

use ridhi_core::constants::{messages, prompts};
use ridhi_core::models::AiSource;
use ridhi_server::config::LlmConfig;
use ridhi_server::llm::{
    ChatMessage, ChatRequest, DeepSeekProvider, GeminiProvider, LlmProvider, ProviderAdapter,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn deepseek_reply(text: &str) -> serde_json::Value {
    json!({
        "model": "deepseek-chat",
        "choices": [{ "message": { "role": "assistant", "content": text }, "finish_reason": "stop" }]
    })
}

#[tokio::test]
async fn test_gemini_sends_history_with_model_role_and_sampling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "earlier" }] },
                { "role": "model", "parts": [{ "text": "reply" }] },
                { "role": "user", "parts": [{ "text": "now?" }] }
            ],
            "generationConfig": { "topK": 40, "maxOutputTokens": 2048 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("osmosis is...")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new("g-key").with_base_url(server.uri());
    let request = ChatRequest::new(vec![
        ChatMessage::user("earlier"),
        ChatMessage::assistant("reply"),
        ChatMessage::user("now?"),
    ])
    .with_max_tokens(2048);

    let response = provider.complete(&request).await.unwrap();
    assert_eq!(response.content, "osmosis is...");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
}

#[tokio::test]
async fn test_gemini_without_candidates_uses_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new("g-key").with_base_url(server.uri());
    let response = provider
        .complete(&ChatRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .unwrap();

    assert_eq!(response.content, messages::NO_GEMINI_RESPONSE);
}

#[tokio::test]
async fn test_gemini_quota_error_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Quota exceeded. Please retry in 6.4s." }
        })))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new("g-key").with_base_url(server.uri());
    let error = provider
        .complete(&ChatRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();

    assert!(error.is_transient());
    assert!(error.message.contains("7 seconds"));
}

#[tokio::test]
async fn test_deepseek_sends_system_prompt_and_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer d-key"))
        .and(body_partial_json(json!({
            "model": "deepseek-chat",
            "messages": [
                { "role": "system", "content": prompts::RIDHI_SYSTEM_PROMPT },
                { "role": "user", "content": "Tell me a joke" }
            ],
            "max_tokens": 2048
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(deepseek_reply("knock knock")))
        .expect(1)
        .mount(&server)
        .await;

    let config = LlmConfig {
        deepseek_api_key: Some("d-key".into()),
        deepseek_base_url: server.uri(),
        ..LlmConfig::default()
    };
    let result = ProviderAdapter::deepseek(&config)
        .call("Tell me a joke", &[])
        .await;

    assert!(result.is_success());
    assert_eq!(result.source(), AiSource::Deepseek);
    assert_eq!(result.text(), "knock knock");
}

#[tokio::test]
async fn test_deepseek_error_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Authentication Fails", "type": "authentication_error" }
        })))
        .mount(&server)
        .await;

    let provider = DeepSeekProvider::new("bad").with_base_url(server.uri());
    let error = provider
        .complete(&ChatRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();

    assert!(!error.is_transient());
    assert!(error.message.contains("Authentication Fails"));
}

#[tokio::test]
async fn test_adapter_retries_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("second try")))
        .mount(&server)
        .await;

    let config = LlmConfig {
        gemini_api_key: Some("g-key".into()),
        gemini_base_url: server.uri(),
        max_retries: 1,
        ..LlmConfig::default()
    };
    let result = ProviderAdapter::gemini(&config).call("How?", &[]).await;

    assert!(result.is_success());
    assert_eq!(result.text(), "second try");
}

#[tokio::test]
async fn test_adapter_timeout_becomes_failed_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply("late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = LlmConfig {
        gemini_api_key: Some("g-key".into()),
        gemini_base_url: server.uri(),
        timeout: Duration::from_millis(200),
        max_retries: 0,
        ..LlmConfig::default()
    };
    let result = ProviderAdapter::gemini(&config).call("How?", &[]).await;

    assert!(!result.is_success());
    assert_eq!(result.source(), AiSource::Gemini);
    assert!(result.error().is_some());
}

#[tokio::test]
async fn test_missing_api_key_fails_without_request() {
    let result = ProviderAdapter::gemini(&LlmConfig::default())
        .call("How?", &[])
        .await;

    assert!(!result.is_success());
    assert!(result.error().unwrap().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_transport_error_does_not_expose_api_key() {
    let config = LlmConfig {
        gemini_api_key: Some("SECRETKEY123".into()),
        gemini_base_url: "http://127.0.0.1:1".into(),
        max_retries: 0,
        ..LlmConfig::default()
    };
    let result = ProviderAdapter::gemini(&config).call("How?", &[]).await;

    assert!(!result.is_success());
    let error = result.error().unwrap();
    assert!(error.contains("HTTP request failed"));
    assert!(!error.contains("SECRETKEY123"));
    assert!(!error.contains("key="));
}
