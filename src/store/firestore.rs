// ABOUTME: Firestore-backed chat repository using the chats/{userId}/messages layout
// ABOUTME: Queries order by timestamp; clears run as a single atomic commit of deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use async_trait::async_trait;
use ridhi_core::constants::collections;
use ridhi_core::models::{ChatEntry, ChatRecord};
use serde_json::Value;

use super::{distinct_labels, ChatRepository};
use crate::errors::AppResult;
use crate::firebase::{Direction, FirestoreClient, Query};

/// Chat history stored in Firestore
#[derive(Debug, Clone)]
pub struct FirestoreChatRepository {
    client: FirestoreClient,
}

impl FirestoreChatRepository {
    /// Repository over a Firestore client
    #[must_use]
    pub const fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    fn user_doc(user_id: &str) -> String {
        format!("{}/{user_id}", collections::CHATS)
    }

    fn messages_path(user_id: &str) -> String {
        format!("{}/{}", Self::user_doc(user_id), collections::MESSAGES)
    }

    fn messages_query(week_label: Option<&str>) -> Query {
        let query = Query::collection(collections::MESSAGES);
        match week_label {
            Some(week) => query.where_eq("weekLabel", week),
            None => query,
        }
    }
}

#[async_trait]
impl ChatRepository for FirestoreChatRepository {
    async fn insert(&self, user_id: &str, record: ChatRecord) -> AppResult<ChatEntry> {
        let id = self
            .client
            .create_document(&Self::messages_path(user_id), &record)
            .await?;
        Ok(ChatEntry { id, record })
    }

    async fn list(
        &self,
        user_id: &str,
        week_label: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<ChatEntry>> {
        let query = Self::messages_query(week_label)
            .order_by("timestamp", Direction::Descending)
            .limit(limit);

        self.client
            .run_query(&Self::user_doc(user_id), &query)
            .await?
            .into_iter()
            .map(|document| {
                let id = document.id.clone();
                document
                    .into_model::<ChatRecord>()
                    .map(|record| ChatEntry { id, record })
            })
            .collect()
    }

    async fn week_labels(&self, user_id: &str) -> AppResult<Vec<String>> {
        let query = Query::collection(collections::MESSAGES)
            .order_by("timestamp", Direction::Descending)
            .select(["weekLabel"]);
        let documents = self
            .client
            .run_query(&Self::user_doc(user_id), &query)
            .await?;

        Ok(distinct_labels(documents.iter().filter_map(|document| {
            document.fields.get("weekLabel").and_then(Value::as_str)
        })))
    }

    async fn delete_where(&self, user_id: &str, week_label: Option<&str>) -> AppResult<usize> {
        let query = Self::messages_query(week_label).select(["__name__"]);
        let names: Vec<String> = self
            .client
            .run_query(&Self::user_doc(user_id), &query)
            .await?
            .into_iter()
            .map(|document| document.name)
            .collect();

        self.client.commit_deletes(&names).await?;
        Ok(names.len())
    }
}
