// ABOUTME: Gmail API payload parsing and outgoing RFC 822 message encoding
// ABOUTME: Header lookups with defaults, base64url body decoding and raw message construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use ridhi_core::models::{MailMessage, MailSummary};
use serde::Deserialize;

/// Gmail bodies are base64url, sometimes padded
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// `users.messages.list` response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

/// Id-only entry of a listing
#[derive(Debug, Deserialize)]
pub(super) struct MessageRef {
    pub id: String,
}

/// `users.messages.get?format=full` response
#[derive(Debug, Default, Deserialize)]
pub(super) struct GmailMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub payload: MessagePart,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: PartBody,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

impl GmailMessage {
    fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    fn subject(&self) -> String {
        self.header("Subject").unwrap_or("No Subject").to_owned()
    }

    fn from(&self) -> String {
        self.header("From").unwrap_or("Unknown").to_owned()
    }

    fn date(&self) -> String {
        self.header("Date").unwrap_or_default().to_owned()
    }

    /// Top-level body when present, otherwise the first `text/plain` part
    fn body(&self) -> String {
        let data = self
            .payload
            .body
            .data
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| {
                self.payload
                    .parts
                    .iter()
                    .find(|part| part.mime_type == "text/plain")
                    .and_then(|part| part.body.data.as_deref())
            });
        data.map(decode_body).unwrap_or_default()
    }

    pub fn into_summary(self, id: String) -> MailSummary {
        MailSummary {
            subject: self.subject(),
            from: self.from(),
            date: self.date(),
            snippet: self.snippet,
            id,
        }
    }

    pub fn into_message(self, id: String) -> MailMessage {
        MailMessage {
            subject: self.subject(),
            from: self.from(),
            date: self.date(),
            body: self.body(),
            snippet: self.snippet,
            id,
        }
    }
}

/// Decode a base64url body; undecodable data yields an empty body
fn decode_body(data: &str) -> String {
    LENIENT_URL_SAFE
        .decode(data.trim())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// RFC 822 text of a plain message, base64url without padding
#[must_use]
pub fn encode_raw_message(to: &str, subject: &str, body: &str) -> String {
    let message = format!("To: {to}\nSubject: {subject}\n\n{body}");
    URL_SAFE_NO_PAD.encode(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GmailMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_header_defaults() {
        let message = parse(json!({ "id": "m1", "snippet": "hey", "payload": { "headers": [] } }));
        let summary = message.into_summary("m1".into());
        assert_eq!(summary.subject, "No Subject");
        assert_eq!(summary.from, "Unknown");
        assert_eq!(summary.date, "");
        assert_eq!(summary.snippet, "hey");
    }

    #[test]
    fn test_body_from_top_level_data() {
        let message = parse(json!({
            "payload": {
                "headers": [{ "name": "Subject", "value": "Exam" }],
                "body": { "data": URL_SAFE_NO_PAD.encode("Room 4B?") }
            }
        }));
        let read = message.into_message("m1".into());
        assert_eq!(read.subject, "Exam");
        assert_eq!(read.body, "Room 4B?");
    }

    #[test]
    fn test_body_from_first_plain_part() {
        let message = parse(json!({
            "payload": {
                "mimeType": "multipart/alternative",
                "body": { "size": 0 },
                "parts": [
                    { "mimeType": "text/html", "body": { "data": URL_SAFE_NO_PAD.encode("<b>hi</b>") } },
                    { "mimeType": "text/plain", "body": { "data": "aGk_Pz4-" } }
                ]
            }
        }));
        assert_eq!(message.into_message("m1".into()).body, "hi??>>");
    }

    #[test]
    fn test_padded_body_is_accepted() {
        assert_eq!(decode_body("aGk="), "hi");
    }

    #[test]
    fn test_raw_message_has_no_padding_and_is_url_safe() {
        let raw = encode_raw_message("a@b.com", "Hi?", "Line one\nLine two>>");
        assert!(!raw.contains('='));
        assert!(!raw.contains('+'));
        assert!(!raw.contains('/'));
        let decoded = URL_SAFE_NO_PAD.decode(raw).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "To: a@b.com\nSubject: Hi?\n\nLine one\nLine two>>"
        );
    }
}
