// ABOUTME: Integration tests for the dual-provider orchestrator
// ABOUTME: Covers routing by prompt kind, partial and total failure, timeouts and task panics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use common::{scripted_orchestrator, Script};
use ridhi_core::constants::messages;
use ridhi_core::models::{AiModelSelector, AiSource, Message};

#[tokio::test]
async fn test_technical_prompt_prefers_gemini() {
    let (orchestrator, _, _) =
        scripted_orchestrator(Script::Reply("gemini text"), Script::Reply("deepseek text"));

    let response = orchestrator.resolve("How do vaccines work?", &[]).await;

    assert!(response.success);
    assert_eq!(response.text, "gemini text");
    assert_eq!(response.sources, [AiSource::Gemini, AiSource::Deepseek]);
    assert_eq!(response.primary, Some(AiSource::Gemini));
    assert_eq!(response.alternative.as_deref(), Some("deepseek text"));
}

#[tokio::test]
async fn test_conversational_prompt_prefers_deepseek() {
    let (orchestrator, _, _) =
        scripted_orchestrator(Script::Reply("gemini text"), Script::Reply("deepseek text"));

    let response = orchestrator.resolve("Tell me a joke", &[]).await;

    assert!(response.success);
    assert_eq!(response.text, "deepseek text");
    assert_eq!(response.sources, [AiSource::Deepseek, AiSource::Gemini]);
    assert_eq!(response.primary, Some(AiSource::Deepseek));
    assert_eq!(response.alternative.as_deref(), Some("gemini text"));
}

#[tokio::test]
async fn test_keyword_inside_longer_word_is_conversational() {
    let (orchestrator, _, _) =
        scripted_orchestrator(Script::Reply("gemini text"), Script::Reply("deepseek text"));

    let response = orchestrator.resolve("Let's plan the showcase", &[]).await;

    assert_eq!(response.primary, Some(AiSource::Deepseek));
}

#[tokio::test]
async fn test_one_failure_uses_the_survivor() {
    let (orchestrator, _, _) =
        scripted_orchestrator(Script::Fail("quota"), Script::Reply("deepseek text"));

    let response = orchestrator.resolve("Explain entropy", &[]).await;

    assert!(response.success);
    assert_eq!(response.text, "deepseek text");
    assert_eq!(response.sources, [AiSource::Deepseek]);
    assert!(response.alternative.is_none());
}

#[tokio::test]
async fn test_both_failures_are_unavailable() {
    let (orchestrator, _, _) = scripted_orchestrator(Script::Fail("a"), Script::Fail("b"));

    let response = orchestrator.resolve("Hello there", &[]).await;

    assert!(!response.success);
    assert!(response.sources.is_empty());
    assert_eq!(response.text, messages::BOTH_PROVIDERS_UNAVAILABLE);
}

#[tokio::test]
async fn test_timeout_counts_as_failure() {
    let (orchestrator, _, _) = scripted_orchestrator(
        Script::Slow(Duration::from_secs(5), "too late"),
        Script::Reply("deepseek text"),
    );

    let response = orchestrator.resolve("What is a prime?", &[]).await;

    assert!(response.success);
    assert_eq!(response.text, "deepseek text");
    assert_eq!(response.sources, [AiSource::Deepseek]);
}

#[tokio::test]
async fn test_panicking_provider_yields_generic_error() {
    let (orchestrator, _, _) = scripted_orchestrator(Script::Panic, Script::Reply("fine"));

    let response = orchestrator.resolve("Hello", &[]).await;

    assert!(!response.success);
    assert_eq!(response.text, messages::GENERIC_PROCESSING_ERROR);
    assert!(response.error.is_some());
}

#[tokio::test]
async fn test_single_selector_calls_only_that_provider() {
    let (orchestrator, gemini, deepseek) =
        scripted_orchestrator(Script::Reply("gemini text"), Script::Reply("deepseek text"));

    let response = orchestrator
        .ask("Tell me a joke", &[], AiModelSelector::Gemini)
        .await;

    assert!(response.success);
    assert_eq!(response.text, "gemini text");
    assert_eq!(response.sources, [AiSource::Gemini]);
    assert_eq!(gemini.prompts().len(), 1);
    assert!(deepseek.prompts().is_empty());
}

#[tokio::test]
async fn test_single_selector_failure_is_not_success() {
    let (orchestrator, _, _) = scripted_orchestrator(Script::Reply("x"), Script::Fail("down"));

    let response = orchestrator
        .ask("Hi", &[], AiModelSelector::Deepseek)
        .await;

    assert!(!response.success);
    assert!(response.sources.is_empty());
    assert_eq!(response.error.as_deref(), Some("down"));
}

#[tokio::test]
async fn test_history_is_forwarded_before_prompt() {
    let (orchestrator, gemini, _) =
        scripted_orchestrator(Script::Reply("a"), Script::Reply("b"));
    let history = [Message::user("earlier"), Message::assistant("reply")];

    orchestrator.resolve("next question", &history).await;

    assert_eq!(gemini.prompts(), ["next question"]);
}

#[tokio::test]
async fn test_summarize_uses_only_gemini() {
    let (orchestrator, gemini, deepseek) =
        scripted_orchestrator(Script::Reply("short summary"), Script::Reply("unused"));

    let summary = orchestrator.summarize("Long lecture notes", Some("lecture")).await;

    assert!(summary.is_success());
    assert_eq!(summary.text(), "short summary");
    let prompts = gemini.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("lecture"));
    assert!(prompts[0].contains("Long lecture notes"));
    assert!(deepseek.prompts().is_empty());
}

#[tokio::test]
async fn test_extract_information_asks_both_providers() {
    let (orchestrator, gemini, deepseek) =
        scripted_orchestrator(Script::Reply("from gemini"), Script::Reply("from deepseek"));

    let response = orchestrator
        .extract_information("Mitochondria make ATP.", "What makes ATP?")
        .await;

    assert!(response.success);
    assert_eq!(gemini.prompts().len(), 1);
    assert_eq!(deepseek.prompts().len(), 1);
    assert!(gemini.prompts()[0].contains("Mitochondria make ATP."));
}
