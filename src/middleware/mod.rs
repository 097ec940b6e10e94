// ABOUTME: HTTP middleware for CORS and request tracing
// ABOUTME: Request id generation, per-request spans and the browser CORS policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

pub mod cors;
pub mod tracing;

pub use cors::setup_cors;
pub use self::tracing::{make_request_span, MakeRequestUuid, REQUEST_ID_HEADER};
