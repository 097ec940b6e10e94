// ABOUTME: Text extraction from uploaded documents
// ABOUTME: PDF extraction runs on the blocking pool; a static extractor stands in for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// MIME type that triggers extraction
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Pulls plain text out of a document
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text of `bytes`
    async fn extract(&self, bytes: Bytes) -> AppResult<String>;
}

/// PDF text extraction with `pdf-extract`
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, bytes: Bytes) -> AppResult<String> {
        let size = bytes.len();
        // The parser is CPU bound and may panic on malformed input; both stay off the runtime threads
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::internal(format!("PDF extraction task failed: {e}")))?
            .map_err(|e| AppError::invalid_input(format!("Could not read PDF: {e}")))?;

        debug!(size, chars = text.chars().count(), "Extracted PDF text");
        Ok(text)
    }
}

/// Returns a fixed result regardless of input
#[derive(Debug, Clone)]
pub struct StaticTextExtractor {
    result: Result<String, String>,
}

impl StaticTextExtractor {
    /// Always yields `text`
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
        }
    }

    /// Always fails with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }
}

#[async_trait]
impl TextExtractor for StaticTextExtractor {
    async fn extract(&self, _bytes: Bytes) -> AppResult<String> {
        self.result.clone().map_err(AppError::invalid_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_pdf_is_an_error_not_a_crash() {
        let result = PdfTextExtractor
            .extract(Bytes::from_static(b"definitely not a pdf"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_static_extractor() {
        let text = StaticTextExtractor::text("hello").extract(Bytes::new()).await;
        assert_eq!(text.unwrap(), "hello");
        assert!(StaticTextExtractor::failing("bad")
            .extract(Bytes::new())
            .await
            .is_err());
    }
}
