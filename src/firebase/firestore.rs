// ABOUTME: Minimal Firestore REST client for documents, structured queries and atomic commits
// ABOUTME: Authenticates with a service account token or talks to the local emulator unauthenticated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use ridhi_core::constants::{endpoints, limits};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::credentials::ServiceAccountTokenSource;
use super::value::{encode_fields, encode_value, Document};
use crate::errors::{AppError, AppResult};
use crate::utils::http_client::shared_client;

/// How requests are authorized
#[derive(Debug, Clone)]
pub enum FirestoreAuth {
    /// OAuth bearer token minted from a service account
    ServiceAccount(Arc<ServiceAccountTokenSource>),
    /// Local emulator; accepts the `owner` pseudo token
    Emulator,
}

/// Sort direction for structured queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASCENDING",
            Self::Descending => "DESCENDING",
        }
    }
}

/// Builder for a `structuredQuery` over one collection
#[derive(Debug, Clone)]
pub struct Query {
    collection: String,
    filters: Vec<(String, Value)>,
    order_by: Vec<(String, Direction)>,
    limit: Option<usize>,
    select: Option<Vec<String>>,
}

impl Query {
    /// Query the direct children of `parent` named `collection`
    #[must_use]
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            select: None,
        }
    }

    /// Add an equality filter; multiple filters are AND-ed
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Add a sort key
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    /// Cap the number of returned documents
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Project only the named fields
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Render the REST `structuredQuery` body
    #[must_use]
    pub fn to_structured_query(&self) -> Value {
        let mut query = Map::new();
        query.insert(
            "from".into(),
            json!([{ "collectionId": self.collection }]),
        );

        let mut filters: Vec<Value> = self
            .filters
            .iter()
            .map(|(field, value)| {
                json!({
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": encode_value(value)
                    }
                })
            })
            .collect();
        match filters.len() {
            0 => {}
            1 => {
                query.insert("where".into(), filters.remove(0));
            }
            _ => {
                query.insert(
                    "where".into(),
                    json!({ "compositeFilter": { "op": "AND", "filters": filters } }),
                );
            }
        }

        if !self.order_by.is_empty() {
            let order: Vec<Value> = self
                .order_by
                .iter()
                .map(|(field, direction)| {
                    json!({ "field": { "fieldPath": field }, "direction": direction.as_str() })
                })
                .collect();
            query.insert("orderBy".into(), Value::Array(order));
        }

        if let Some(limit) = self.limit {
            query.insert("limit".into(), json!(limit));
        }

        if let Some(fields) = &self.select {
            let paths: Vec<Value> = fields
                .iter()
                .map(|field| json!({ "fieldPath": field }))
                .collect();
            query.insert("select".into(), json!({ "fields": paths }));
        }

        Value::Object(query)
    }
}

/// Firestore REST client scoped to one project's default database
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    http_client: Client,
    documents_url: String,
    documents_path: String,
    auth: FirestoreAuth,
}

impl FirestoreClient {
    /// Client for the hosted service
    #[must_use]
    pub fn new(project_id: &str, auth: FirestoreAuth) -> Self {
        Self::with_base_url(endpoints::FIRESTORE_API_BASE, project_id, auth)
    }

    /// Client for the local emulator at `host:port`
    #[must_use]
    pub fn emulator(host: &str, project_id: &str) -> Self {
        Self::with_base_url(&format!("http://{host}/v1"), project_id, FirestoreAuth::Emulator)
    }

    /// Client against an arbitrary API root (`.../v1`)
    #[must_use]
    pub fn with_base_url(base_url: &str, project_id: &str, auth: FirestoreAuth) -> Self {
        let documents_path = format!("projects/{project_id}/databases/(default)/documents");
        Self {
            http_client: shared_client().clone(),
            documents_url: format!("{}/{documents_path}", base_url.trim_end_matches('/')),
            documents_path,
            auth,
        }
    }

    /// Resource name of a document, as used in commit writes
    #[must_use]
    pub fn document_name(&self, path: &str) -> String {
        format!("{}/{}", self.documents_path, encode_path(path))
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.documents_url.clone()
        } else {
            format!("{}/{}", self.documents_url, encode_path(path))
        }
    }

    async fn authorize(&self, request: RequestBuilder) -> AppResult<RequestBuilder> {
        match &self.auth {
            FirestoreAuth::ServiceAccount(source) => {
                Ok(request.bearer_auth(source.access_token().await?))
            }
            FirestoreAuth::Emulator => Ok(request.bearer_auth("owner")),
        }
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        self.authorize(request)
            .await?
            .send()
            .await
            .map_err(|e| AppError::database(format!("Firestore request failed: {e}")))
    }

    /// Create a document with a generated id under `collection_path`; returns the id
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails
    pub async fn create_document<T: Serialize + Sync>(
        &self,
        collection_path: &str,
        model: &T,
    ) -> AppResult<String> {
        let body = json!({ "fields": encode_fields(model)? });
        let response = self
            .send(self.http_client.post(self.url(collection_path)).json(&body))
            .await?;
        let resource = read_json(response, "create").await?;
        let document = Document::from_resource(&resource)?;
        debug!(collection = collection_path, id = %document.id, "Created Firestore document");
        Ok(document.id)
    }

    /// Fetch a document; `None` when it does not exist
    ///
    /// # Errors
    ///
    /// Returns a database error if the read fails
    pub async fn get_document(&self, document_path: &str) -> AppResult<Option<Document>> {
        let response = self
            .send(self.http_client.get(self.url(document_path)))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resource = read_json(response, "get").await?;
        Document::from_resource(&resource).map(Some)
    }

    /// Create or fully overwrite a document at a known path
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails
    pub async fn set_document<T: Serialize + Sync>(
        &self,
        document_path: &str,
        model: &T,
    ) -> AppResult<()> {
        let body = json!({ "fields": encode_fields(model)? });
        let response = self
            .send(self.http_client.patch(self.url(document_path)).json(&body))
            .await?;
        read_json(response, "set").await.map(|_| ())
    }

    /// Delete a document; deleting a missing document succeeds
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails
    pub async fn delete_document(&self, document_path: &str) -> AppResult<()> {
        let response = self
            .send(self.http_client.delete(self.url(document_path)))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        read_json(response, "delete").await.map(|_| ())
    }

    /// Run a structured query against the children of `parent_path` (empty for the root)
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn run_query(&self, parent_path: &str, query: &Query) -> AppResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.url(parent_path));
        let body = json!({ "structuredQuery": query.to_structured_query() });
        let response = self
            .send(self.http_client.post(url).json(&body))
            .await?;
        let rows = read_json(response, "query").await?;

        // Each row carries `readTime`; only rows with a `document` are results
        rows.as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row.get("document"))
                    .map(Document::from_resource)
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Delete documents by resource name in one atomic commit
    ///
    /// # Errors
    ///
    /// Returns a database error if the commit fails or exceeds the per-commit write limit
    pub async fn commit_deletes(&self, names: &[String]) -> AppResult<()> {
        if names.is_empty() {
            return Ok(());
        }
        if names.len() > limits::FIRESTORE_MAX_BATCH_WRITES {
            return Err(AppError::database(format!(
                "cannot delete {} documents in one commit (max {})",
                names.len(),
                limits::FIRESTORE_MAX_BATCH_WRITES
            )));
        }

        let writes: Vec<Value> = names.iter().map(|name| json!({ "delete": name })).collect();
        let url = format!("{}:commit", self.documents_url);
        let response = self
            .send(self.http_client.post(url).json(&json!({ "writes": writes })))
            .await?;
        read_json(response, "commit").await.map(|_| ())
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

async fn read_json(response: Response, operation: &str) -> AppResult<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = %status, "Firestore request rejected");
        return Err(AppError::database(format!("Firestore {operation} failed ({status})"))
            .with_details(body));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::database(format!("Invalid Firestore {operation} response: {e}")))
}
