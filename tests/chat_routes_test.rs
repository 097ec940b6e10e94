// ABOUTME: Integration tests for the chat route handlers
// ABOUTME: Tests messaging, conditional persistence, week browsing and history deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{test_context, Script, TestContextBuilder};
use helpers::axum_test::AxumTestRequest;
use ridhi_core::constants::messages;
use ridhi_server::routes::chat::{ChatRoutes, HistoryResponse, SendMessageResponse, WeeksResponse};
use serde_json::{json, Value};

#[tokio::test]
async fn test_message_is_answered_and_stored() {
    let ctx = test_context();
    let router = ChatRoutes::routes(ctx.resources.clone());

    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "message": "How do magnets work?", "userId": "u1" }))
        .send(router.clone())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: SendMessageResponse = response.json();
    assert!(body.success);
    assert_eq!(body.response, "gemini answer");
    assert_eq!(body.sources.len(), 2);

    let history: HistoryResponse = AxumTestRequest::get("/api/chat/history/u1")
        .send(router)
        .await
        .json();
    assert_eq!(history.messages.len(), 1);
    let entry = &history.messages[0].record;
    assert_eq!(entry.user_message, "How do magnets work?");
    assert_eq!(entry.ai_response, "gemini answer");
    assert_eq!(entry.week_label, "Week 2 March");
    assert_eq!(entry.timestamp, "2024-03-08T10:00:00.000Z");
}

#[tokio::test]
async fn test_missing_message_is_rejected() {
    let ctx = test_context();

    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "userId": "u1" }))
        .send(ChatRoutes::routes(ctx.resources.clone()))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn test_anonymous_message_is_answered_without_storage() {
    let ctx = test_context();

    for body in [json!({ "message": "Hello" }), json!({ "message": "Hello", "userId": "" })] {
        let response = AxumTestRequest::post("/api/chat/message")
            .json(&body)
            .send(ChatRoutes::routes(ctx.resources.clone()))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: SendMessageResponse = response.json();
        assert!(body.success);
        assert_eq!(body.response, "deepseek answer");
    }
}

#[tokio::test]
async fn test_failed_answer_is_not_stored() {
    let ctx = TestContextBuilder::default()
        .providers(Script::Fail("down"), Script::Fail("down"))
        .build();
    let router = ChatRoutes::routes(ctx.resources.clone());

    let body: SendMessageResponse = AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "message": "Hello", "userId": "u1" }))
        .send(router.clone())
        .await
        .json();

    assert!(!body.success);
    assert_eq!(body.response, messages::BOTH_PROVIDERS_UNAVAILABLE);
    assert!(body.sources.is_empty());

    let history: HistoryResponse = AxumTestRequest::get("/api/chat/history/u1")
        .send(router)
        .await
        .json();
    assert!(history.messages.is_empty());
}

#[tokio::test]
async fn test_ai_model_selects_one_provider() {
    let ctx = test_context();

    let body: SendMessageResponse = AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "message": "How?", "aiModel": "deepseek" }))
        .send(ChatRoutes::routes(ctx.resources.clone()))
        .await
        .json();

    assert_eq!(body.response, "deepseek answer");
    assert_eq!(body.sources.len(), 1);
    assert!(ctx.gemini.prompts().is_empty());
}

#[tokio::test]
async fn test_weeks_and_week_filter() {
    let ctx = test_context();
    let router = ChatRoutes::routes(ctx.resources.clone());

    for (day, text) in [(1, "first"), (8, "second"), (9, "third")] {
        ctx.clock
            .set(Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap());
        AxumTestRequest::post("/api/chat/message")
            .json(&json!({ "message": text, "userId": "u1" }))
            .send(router.clone())
            .await;
    }

    let weeks: WeeksResponse = AxumTestRequest::get("/api/chat/weeks/u1")
        .send(router.clone())
        .await
        .json();
    assert_eq!(weeks.weeks, ["Week 2 March", "Week 1 March"]);

    let history: HistoryResponse = AxumTestRequest::get("/api/chat/history/u1?week=Week%202%20March")
        .send(router)
        .await
        .json();
    let prompts: Vec<_> = history
        .messages
        .iter()
        .map(|m| m.record.user_message.as_str())
        .collect();
    assert_eq!(prompts, ["third", "second"]);
}

#[tokio::test]
async fn test_delete_one_week_then_all() {
    let ctx = test_context();
    let router = ChatRoutes::routes(ctx.resources.clone());

    for day in [1, 8] {
        ctx.clock
            .set(Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap());
        AxumTestRequest::post("/api/chat/message")
            .json(&json!({ "message": "hi", "userId": "u1" }))
            .send(router.clone())
            .await;
    }

    let response = AxumTestRequest::delete("/api/chat/history/u1?week=Week%201%20March")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Chat history cleared");

    let weeks: WeeksResponse = AxumTestRequest::get("/api/chat/weeks/u1")
        .send(router.clone())
        .await
        .json();
    assert_eq!(weeks.weeks, ["Week 2 March"]);

    AxumTestRequest::delete("/api/chat/history/u1")
        .send(router.clone())
        .await;
    let history: HistoryResponse = AxumTestRequest::get("/api/chat/history/u1")
        .send(router)
        .await
        .json();
    assert!(history.messages.is_empty());
}

#[tokio::test]
async fn test_history_is_isolated_per_user() {
    let ctx = test_context();
    let router = ChatRoutes::routes(ctx.resources.clone());

    AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "message": "mine", "userId": "u1" }))
        .send(router.clone())
        .await;

    let history: HistoryResponse = AxumTestRequest::get("/api/chat/history/u2")
        .send(router)
        .await
        .json();
    assert!(history.messages.is_empty());
}

#[tokio::test]
async fn test_whitespace_week_only_matches_that_label() {
    let ctx = test_context();
    let router = ChatRoutes::routes(ctx.resources.clone());

    AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "message": "keep me", "userId": "u1" }))
        .send(router.clone())
        .await;

    let history: HistoryResponse = AxumTestRequest::get("/api/chat/history/u1?week=%20")
        .send(router.clone())
        .await
        .json();
    assert!(history.messages.is_empty());

    let response = AxumTestRequest::delete("/api/chat/history/u1?week=%20")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let history: HistoryResponse = AxumTestRequest::get("/api/chat/history/u1")
        .send(router)
        .await
        .json();
    assert_eq!(history.messages.len(), 1);
    assert_eq!(history.messages[0].record.user_message, "keep me");
}

#[tokio::test]
async fn test_clearing_empty_week_twice_succeeds() {
    let ctx = test_context();
    let router = ChatRoutes::routes(ctx.resources.clone());

    for _ in 0..2 {
        let response = AxumTestRequest::delete("/api/chat/history/u1?week=Week%203%20March")
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Chat history cleared");
    }
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let ctx = test_context();
    let router = ChatRoutes::routes(ctx.resources.clone());

    let response = AxumTestRequest::post("/api/chat/message")
        .raw_body("application/json", "{\"message\": ")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");

    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({
            "message": "Hi",
            "conversationHistory": [{ "role": "narrator", "content": "once upon" }]
        }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(ctx.gemini.prompts().is_empty());
}
