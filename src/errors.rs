// ABOUTME: Re-exports the unified error types from ridhi-core
// ABOUTME: Keeps `crate::errors::AppError` as the single import path inside the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # Unified Error Handling System
//!
//! The error types live in `ridhi-core` so that the models and constants
//! crate can share them; this module is the server-side import path.

pub use ridhi_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse};
