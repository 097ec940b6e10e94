// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Scripted LLM providers, orchestrators and in-memory ServerResources on a fixed clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `ridhi_server`

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use ridhi_core::models::AiSource;
use ridhi_server::clock::FixedClock;
use ridhi_server::config::ServerConfig;
use ridhi_server::errors::AppError;
use ridhi_server::files::{InMemoryBlobStore, StaticTextExtractor, TextExtractor};
use ridhi_server::llm::{ChatRequest, ChatResponse, LlmProvider, ProviderAdapter, RetryPolicy};
use ridhi_server::orchestrator::{KeywordClassifier, Orchestrator};
use ridhi_server::resources::{ServerResources, ServerResourcesBuilder};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// What a scripted provider does on every call
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer with this text
    Reply(&'static str),
    /// Fail with a transient upstream error carrying this message
    Fail(&'static str),
    /// Sleep, then answer
    Slow(Duration, &'static str),
    /// Panic inside the provider task
    Panic,
}

/// Provider that follows a [`Script`] and records the prompts it saw
pub struct ScriptedProvider {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Last user turn of every request, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        if let Some(last) = request.messages.last() {
            self.prompts.lock().unwrap().push(last.content.clone());
        }
        let content = match &self.script {
            Script::Reply(text) => (*text).to_owned(),
            Script::Fail(message) => {
                return Err(AppError::external_service("Scripted", *message));
            }
            Script::Slow(delay, text) => {
                tokio::time::sleep(*delay).await;
                (*text).to_owned()
            }
            Script::Panic => panic!("scripted provider panicked"),
        };
        Ok(ChatResponse {
            content,
            model: "scripted-model".to_owned(),
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Adapter without retries and with a short timeout
pub fn adapter(source: AiSource, provider: Arc<ScriptedProvider>) -> ProviderAdapter {
    ProviderAdapter::new(source, provider)
        .with_timeout(Duration::from_millis(500))
        .with_retry(RetryPolicy::none())
}

/// Orchestrator over two scripts, returning the providers for inspection
pub fn scripted_orchestrator(
    gemini: Script,
    deepseek: Script,
) -> (Orchestrator, Arc<ScriptedProvider>, Arc<ScriptedProvider>) {
    let provider_a = Arc::new(ScriptedProvider::new(gemini));
    let provider_b = Arc::new(ScriptedProvider::new(deepseek));
    let orchestrator = Orchestrator::new(
        adapter(AiSource::Gemini, Arc::clone(&provider_a)),
        adapter(AiSource::Deepseek, Arc::clone(&provider_b)),
        KeywordClassifier::technical().unwrap(),
    );
    (orchestrator, provider_a, provider_b)
}

/// 2024-03-08 10:00:00 UTC, a Friday in "Week 2 March"
pub fn test_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 8, 10, 0, 0).unwrap()
}

/// In-memory resources plus handles the tests inspect
pub struct TestContext {
    pub resources: Arc<ServerResources>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub clock: Arc<FixedClock>,
    pub gemini: Arc<ScriptedProvider>,
    pub deepseek: Arc<ScriptedProvider>,
}

/// Builder for [`TestContext`]
pub struct TestContextBuilder {
    config: ServerConfig,
    gemini: Script,
    deepseek: Script,
    extractor: Arc<dyn TextExtractor>,
}

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self {
            config: ServerConfig::default(),
            gemini: Script::Reply("gemini answer"),
            deepseek: Script::Reply("deepseek answer"),
            extractor: Arc::new(StaticTextExtractor::text("extracted text")),
        }
    }
}

impl TestContextBuilder {
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn providers(mut self, gemini: Script, deepseek: Script) -> Self {
        self.gemini = gemini;
        self.deepseek = deepseek;
        self
    }

    pub fn extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn build(self) -> TestContext {
        init_test_logging();
        let (orchestrator, gemini, deepseek) = scripted_orchestrator(self.gemini, self.deepseek);
        let blobs = Arc::new(InMemoryBlobStore::new("test-bucket"));
        let clock = Arc::new(FixedClock::new(test_instant()));

        let resources = ServerResourcesBuilder::new(self.config)
            .with_orchestrator(orchestrator)
            .with_blob_store(Arc::clone(&blobs) as _)
            .with_extractor(self.extractor)
            .with_clock(Arc::clone(&clock) as _)
            .build()
            .unwrap();

        TestContext {
            resources: Arc::new(resources),
            blobs,
            clock,
            gemini,
            deepseek,
        }
    }
}

/// Default in-memory context: both providers answer, extraction yields fixed text
pub fn test_context() -> TestContext {
    TestContextBuilder::default().build()
}
