// ABOUTME: Cloud Storage blob store over the JSON API
// ABOUTME: Media upload, custom metadata patch, allUsers READER ACL and object delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use ridhi_core::constants::endpoints;
use serde_json::json;
use tracing::{debug, warn};

use super::credentials::ServiceAccountTokenSource;
use crate::errors::{AppError, AppResult};
use crate::files::{BlobStore, BlobUpload};
use crate::utils::http_client::shared_client;

/// Blob store backed by a Cloud Storage bucket
#[derive(Debug, Clone)]
pub struct CloudStorageBlobStore {
    http_client: Client,
    bucket: String,
    api_base: String,
    upload_base: String,
    tokens: Arc<ServiceAccountTokenSource>,
}

impl CloudStorageBlobStore {
    /// Store for `bucket`
    #[must_use]
    pub fn new(bucket: impl Into<String>, tokens: Arc<ServiceAccountTokenSource>) -> Self {
        Self {
            http_client: shared_client().clone(),
            bucket: bucket.into(),
            api_base: endpoints::STORAGE_API_BASE.to_owned(),
            upload_base: endpoints::STORAGE_UPLOAD_BASE.to_owned(),
            tokens,
        }
    }

    /// Bucket name
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            self.api_base,
            self.bucket,
            urlencoding::encode(path)
        )
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> AppResult<Response> {
        let token = self.tokens.access_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Cloud Storage {operation} failed: {e}")))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = %status, "Cloud Storage request rejected");
        Err(AppError::storage(format!("Cloud Storage {operation} failed ({status})")).with_details(body))
    }
}

#[async_trait]
impl BlobStore for CloudStorageBlobStore {
    async fn put(&self, upload: BlobUpload) -> AppResult<()> {
        let size = upload.bytes.len();
        let url = format!("{}/b/{}/o", self.upload_base, self.bucket);
        let request = self
            .http_client
            .post(url)
            .query(&[("uploadType", "media"), ("name", upload.path.as_str())])
            .header(reqwest::header::CONTENT_TYPE, &upload.content_type)
            .body(upload.bytes);
        self.send(request, "upload").await?;

        if !upload.metadata.is_empty() {
            let request = self
                .http_client
                .patch(self.object_url(&upload.path))
                .json(&json!({ "metadata": upload.metadata }));
            self.send(request, "metadata").await?;
        }

        debug!(path = %upload.path, size, "Uploaded object");
        Ok(())
    }

    async fn make_public(&self, path: &str) -> AppResult<()> {
        let request = self
            .http_client
            .post(format!("{}/acl", self.object_url(path)))
            .json(&json!({ "entity": "allUsers", "role": "READER" }));
        let response = self.send(request, "acl").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!("Blob {path}")));
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}/{path}", endpoints::STORAGE_PUBLIC_BASE, self.bucket)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self
            .send(self.http_client.delete(self.object_url(path)), "delete")
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!("Blob {path}")));
        }
        Ok(())
    }
}
