// ABOUTME: Core data models shared by the Ridhi server, its stores and its routes
// ABOUTME: Re-exports chat, provider result, file and mail types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # Data Models
//!
//! - `Message`: one ephemeral conversation turn passed to the orchestrator
//! - `ChatEntry`: one persisted exchange, partitioned by week label
//! - `AiResult` / `OrchestratedResponse`: provider and orchestrator outputs
//! - `FileRecord`: uploaded file metadata with extracted text and summary
//! - `MailSummary` / `MailMessage`: Gmail listing and full message views
//!
//! JSON field names are camelCase throughout to match the web client.

mod ai;
mod chat;
mod file;
mod mail;

pub use ai::{AiModelSelector, AiResult, AiSource, OrchestratedResponse};
pub use chat::{ChatEntry, ChatRecord, Message, MessageRole};
pub use file::{FileMetadata, FileRecord};
pub use mail::{MailMessage, MailSummary, OAuthTokens};
