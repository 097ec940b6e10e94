// ABOUTME: File route handlers: multipart upload with PDF summary, listing, lookup, Q&A and deletion
// ABOUTME: Delegates to FileService and shapes its results into the client's JSON envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use ridhi_core::models::FileRecord;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{server_failure, JsonBody};
use crate::errors::AppError;
use crate::files::{NewUpload, UploadReceipt};
use crate::resources::ServerResources;

/// Headroom for the multipart envelope and text fields around the file
pub(crate) const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Content type assumed when the client sends none
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Reply of a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always true
    pub success: bool,
    /// Upload details
    #[serde(flatten)]
    pub receipt: UploadReceipt,
}

/// `?category=` filter
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// Only files in this category
    #[serde(default)]
    pub category: Option<String>,
}

/// Body of `POST /api/files/query`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileQueryRequest {
    /// File to ask about
    #[serde(default)]
    pub file_id: Option<String>,
    /// The question
    #[serde(default)]
    pub query: Option<String>,
}

/// Reply of `GET /api/files/list/:userId`
#[derive(Debug, Serialize, Deserialize)]
pub struct FileListResponse {
    /// Always true
    pub success: bool,
    /// Newest first
    pub files: Vec<FileRecord>,
}

/// File routes handler
pub struct FileRoutes;

impl FileRoutes {
    /// Create all file routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let body_limit = resources.files.max_file_bytes() + MULTIPART_OVERHEAD_BYTES;

        Router::new()
            .route(
                "/api/files/upload",
                post(Self::upload).layer(DefaultBodyLimit::max(body_limit)),
            )
            .route("/api/files/list/:user_id", get(Self::list))
            .route("/api/files/query", post(Self::query))
            .route(
                "/api/files/:file_id",
                get(Self::get_file).delete(Self::delete_file),
            )
            .with_state(resources)
    }

    /// Multipart fields: `file`, `userId`, `category`
    async fn upload(
        State(resources): State<Arc<ServerResources>>,
        multipart: Multipart,
    ) -> Result<Response, AppError> {
        let upload = read_upload(multipart).await?;
        let receipt = resources
            .files
            .upload(upload)
            .await
            .map_err(server_failure("Failed to upload file"))?;

        Ok((
            StatusCode::OK,
            Json(UploadResponse {
                success: true,
                receipt,
            }),
        )
            .into_response())
    }

    async fn list(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Query(query): Query<CategoryQuery>,
    ) -> Result<Response, AppError> {
        let files = resources
            .files
            .list(&user_id, query.category.as_deref())
            .await
            .map_err(server_failure("Failed to fetch files"))?;

        Ok((StatusCode::OK, Json(FileListResponse { success: true, files })).into_response())
    }

    async fn get_file(
        State(resources): State<Arc<ServerResources>>,
        Path(file_id): Path<String>,
    ) -> Result<Response, AppError> {
        let file = resources
            .files
            .get(&file_id)
            .await
            .map_err(server_failure("Failed to fetch file"))?;

        Ok((StatusCode::OK, Json(json!({ "success": true, "file": file }))).into_response())
    }

    async fn query(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<FileQueryRequest>,
    ) -> Result<Response, AppError> {
        let answer = resources
            .files
            .query(
                request.file_id.as_deref().unwrap_or_default(),
                request.query.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(server_failure("Failed to query file"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "answer": answer.answer,
                "fileName": answer.file_name,
            })),
        )
            .into_response())
    }

    async fn delete_file(
        State(resources): State<Arc<ServerResources>>,
        Path(file_id): Path<String>,
    ) -> Result<Response, AppError> {
        resources
            .files
            .delete(&file_id)
            .await
            .map_err(server_failure("Failed to delete file"))?;

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "message": "File deleted successfully" })),
        )
            .into_response())
    }
}

/// Collect the upload fields; unknown fields are ignored
async fn read_upload(mut multipart: Multipart) -> Result<NewUpload, AppError> {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut user_id = String::new();
    let mut category = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::invalid_input(format!("Invalid file field: {e}")))?;
                file = Some((file_name, content_type, bytes));
            }
            Some("userId") => {
                user_id = field
                    .text()
                    .await
                    .map_err(|e| AppError::invalid_input(format!("Invalid userId field: {e}")))?;
            }
            Some("category") => {
                category = Some(field.text().await.map_err(|e| {
                    AppError::invalid_input(format!("Invalid category field: {e}"))
                })?);
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::missing_field("No file uploaded"))?;

    Ok(NewUpload {
        user_id,
        category,
        file_name,
        content_type,
        bytes,
    })
}
