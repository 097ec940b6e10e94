// ABOUTME: Core types and constants for the Ridhi student assistant API
// ABOUTME: Foundation crate with error handling, chat/file models, and fixed prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

#![deny(unsafe_code)]

//! # Ridhi Core
//!
//! Foundation crate providing shared types and constants for the Ridhi
//! student assistant API. It changes rarely and has no I/O of its own.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Chat messages, persisted chat entries, provider results, file records
//! - **constants**: Fixed prompts, user-facing messages, and limits

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Core data models shared by the server and its stores
pub mod models;

/// Application constants organized by domain
pub mod constants;
