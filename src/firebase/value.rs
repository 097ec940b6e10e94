// ABOUTME: Conversion between plain JSON and Firestore's typed REST value encoding
// ABOUTME: Lets stores serialize their models with serde and persist them as document fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! Firestore REST documents wrap every value in a type tag
//! (`{"stringValue": "x"}`, `{"integerValue": "12"}`, ...). These helpers
//! map between that encoding and `serde_json::Value`, so models only need
//! `Serialize`/`Deserialize`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Number, Value};

use crate::errors::{AppError, AppResult};

/// Encode one JSON value as a Firestore value
#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => n.as_i64().map_or_else(
            || json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
            |i| json!({ "integerValue": i.to_string() }),
        ),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_map(map) } }),
    }
}

fn encode_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Serialize a model into a Firestore `fields` object
///
/// # Errors
///
/// Returns an error if the model does not serialize to a JSON object
pub fn encode_fields<T: Serialize>(model: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(model)? {
        Value::Object(map) => Ok(encode_map(&map)),
        other => Err(AppError::internal(format!(
            "document fields must be an object, got {other}"
        ))),
    }
}

/// Decode one Firestore value into plain JSON
#[must_use]
pub fn decode_value(value: &Value) -> Value {
    let Some((tag, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return Value::Null;
    };

    match tag.as_str() {
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or_default()),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| inner.as_i64())
            .map_or(Value::Null, |i| Value::Number(i.into())),
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

/// Decode a Firestore `fields` object into a plain JSON object
#[must_use]
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// A decoded document: its id (last path segment) and plain JSON fields
#[derive(Debug, Clone)]
pub struct Document {
    /// Full resource name
    pub name: String,
    /// Document id
    pub id: String,
    /// Decoded fields
    pub fields: Map<String, Value>,
}

impl Document {
    /// Decode a REST document resource
    ///
    /// # Errors
    ///
    /// Returns an error if the resource has no name
    pub fn from_resource(resource: &Value) -> AppResult<Self> {
        let name = resource
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::database("Firestore document without a name"))?
            .to_owned();
        let id = name.rsplit('/').next().unwrap_or_default().to_owned();
        let fields = resource
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_default();
        Ok(Self { name, id, fields })
    }

    /// Deserialize the fields into a model
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not match the model
    pub fn into_model<T: DeserializeOwned>(self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.fields)).map_err(|e| {
            AppError::database(format!("Malformed document {}: {e}", self.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_tags() {
        let encoded = encode_value(&json!({
            "userMessage": "hi",
            "sources": ["gemini"],
            "fileSize": 1024,
            "ratio": 0.5,
            "done": true,
            "missing": null
        }));
        let fields = &encoded["mapValue"]["fields"];
        assert_eq!(fields["userMessage"], json!({ "stringValue": "hi" }));
        assert_eq!(
            fields["sources"],
            json!({ "arrayValue": { "values": [{ "stringValue": "gemini" }] } })
        );
        assert_eq!(fields["fileSize"], json!({ "integerValue": "1024" }));
        assert_eq!(fields["ratio"], json!({ "doubleValue": 0.5 }));
        assert_eq!(fields["done"], json!({ "booleanValue": true }));
        assert_eq!(fields["missing"], json!({ "nullValue": null }));
    }

    #[test]
    fn test_decoding_server_values() {
        let resource = json!({
            "name": "projects/p/databases/(default)/documents/files/abc123",
            "fields": {
                "fileSize": { "integerValue": "2048" },
                "uploadedAt": { "timestampValue": "2024-03-08T10:00:00Z" },
                "tags": { "arrayValue": {} },
                "keys": { "mapValue": { "fields": { "k": { "stringValue": "v" } } } }
            }
        });
        let document = Document::from_resource(&resource).unwrap();
        assert_eq!(document.id, "abc123");
        assert_eq!(document.fields["fileSize"], json!(2048));
        assert_eq!(document.fields["uploadedAt"], json!("2024-03-08T10:00:00Z"));
        assert_eq!(document.fields["tags"], json!([]));
        assert_eq!(document.fields["keys"], json!({ "k": "v" }));
    }

    #[test]
    fn test_non_object_model_is_rejected() {
        assert!(encode_fields(&"just a string").is_err());
    }
}
