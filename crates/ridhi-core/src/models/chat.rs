// ABOUTME: Conversation turn and persisted chat entry types
// ABOUTME: ChatEntry is write-once and grouped by its derived week label
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use serde::{Deserialize, Serialize};

use super::AiSource;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Student input
    User,
    /// Assistant reply
    #[serde(alias = "model")]
    Assistant,
}

impl MessageRole {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single turn in a conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the turn
    pub role: MessageRole,
    /// Turn text
    pub content: String,
}

impl Message {
    /// Create a user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Stored fields of one exchange, as written to the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    /// The prompt the student sent
    pub user_message: String,
    /// The selected reply
    pub ai_response: String,
    /// Contributing providers, primary first
    #[serde(default)]
    pub sources: Vec<AiSource>,
    /// RFC 3339 instant assigned at write time
    pub timestamp: String,
    /// Partition key derived from the write date, e.g. "Week 2 March"
    #[serde(default)]
    pub week_label: String,
}

/// A persisted exchange together with its store-generated id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// Store-generated identifier
    pub id: String,
    /// Stored fields, flattened into the JSON object
    #[serde(flatten)]
    pub record: ChatRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_entry_serializes_flat_camel_case() {
        let entry = ChatEntry {
            id: "abc".into(),
            record: ChatRecord {
                user_message: "hi".into(),
                ai_response: "hello".into(),
                sources: vec![AiSource::Deepseek, AiSource::Gemini],
                timestamp: "2024-03-08T10:00:00.000Z".into(),
                week_label: "Week 2 March".into(),
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["userMessage"], "hi");
        assert_eq!(json["aiResponse"], "hello");
        assert_eq!(json["sources"], serde_json::json!(["deepseek", "gemini"]));
        assert_eq!(json["weekLabel"], "Week 2 March");
    }

    #[test]
    fn test_history_roles_accept_model_alias() {
        let message: Message =
            serde_json::from_str(r#"{"role":"model","content":"earlier reply"}"#).unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
    }
}
