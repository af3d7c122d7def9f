//! Wire Serializer
//!
//! Converts in-memory values into canonical wire payloads. One dispatch
//! table drives two serializer variants: the transport variant carries
//! binary payloads verbatim, while the logging variant replaces them with a
//! human-readable size placeholder. Both variants share every other branch,
//! and the dispatch precedence is fixed:
//!
//! 1. null — no payload at all;
//! 2. already-binary values — passed through unchanged;
//! 3. scalars and timestamps — canonical text form, labeled as text;
//! 4. self-describing values (the [`Portable`] capability) — recursed;
//! 5. everything else — structured JSON text.

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::content::ContentType;
use crate::error::{BridgeError, Result};

/// Opt-in capability for values that know their own wire form.
///
/// Checked after scalars and before the JSON fallback; a `Portable` value
/// is serialized by recursing on whatever [`Portable::to_bridge`] returns.
pub trait Portable: Send + Sync {
    fn to_bridge(&self) -> BridgeValue;
}

/// A value accepted by the serializer.
#[derive(Clone)]
pub enum BridgeValue {
    /// Absent value; serializes to no payload.
    Null,
    /// Already in binary wire form.
    Binary(Bytes),
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// A self-describing value.
    Object(Arc<dyn Portable>),
    /// Structured fallback.
    Json(serde_json::Value),
}

impl fmt::Debug for BridgeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeValue::Null => write!(f, "Null"),
            BridgeValue::Binary(bytes) => write!(f, "Binary({} bytes)", bytes.len()),
            BridgeValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            BridgeValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            BridgeValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            BridgeValue::Timestamp(t) => f.debug_tuple("Timestamp").field(t).finish(),
            BridgeValue::Object(_) => write!(f, "Object(..)"),
            BridgeValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

impl From<&str> for BridgeValue {
    fn from(value: &str) -> Self {
        BridgeValue::Text(value.to_string())
    }
}

impl From<String> for BridgeValue {
    fn from(value: String) -> Self {
        BridgeValue::Text(value)
    }
}

impl From<f64> for BridgeValue {
    fn from(value: f64) -> Self {
        BridgeValue::Number(value)
    }
}

impl From<bool> for BridgeValue {
    fn from(value: bool) -> Self {
        BridgeValue::Bool(value)
    }
}

impl From<Bytes> for BridgeValue {
    fn from(value: Bytes) -> Self {
        BridgeValue::Binary(value)
    }
}

impl From<Vec<u8>> for BridgeValue {
    fn from(value: Vec<u8>) -> Self {
        BridgeValue::Binary(Bytes::from(value))
    }
}

impl From<DateTime<Utc>> for BridgeValue {
    fn from(value: DateTime<Utc>) -> Self {
        BridgeValue::Timestamp(value)
    }
}

impl From<serde_json::Value> for BridgeValue {
    fn from(value: serde_json::Value) -> Self {
        BridgeValue::Json(value)
    }
}

/// A serialized payload: a media type label plus optional body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct WirePayload {
    pub content_type: ContentType,
    pub body: Option<Bytes>,
}

impl WirePayload {
    /// The wire-null payload: nothing to send.
    pub fn empty() -> Self {
        Self {
            content_type: ContentType::Binary,
            body: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Text,
            body: Some(Bytes::from(text.into())),
        }
    }

    pub fn json(body: impl Into<Bytes>) -> Self {
        Self {
            content_type: ContentType::Json,
            body: Some(body.into()),
        }
    }

    pub fn binary(body: impl Into<Bytes>) -> Self {
        Self {
            content_type: ContentType::Binary,
            body: Some(body.into()),
        }
    }

    /// Body interpreted as UTF-8, when present and valid.
    pub fn as_text(&self) -> Option<&str> {
        self.body.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// How the binary branch terminates; the only point where the two
/// serializer variants differ.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BinaryStyle {
    Verbatim,
    Summarized,
}

/// Serialize a value for transport. Binary payloads are carried verbatim.
pub fn serialize(value: &BridgeValue) -> Result<WirePayload> {
    encode(value, BinaryStyle::Verbatim)
}

/// Render a value for logging. Binary payloads become a size placeholder;
/// everything else renders exactly as it would go over the wire.
pub fn describe(value: &BridgeValue) -> String {
    match encode(value, BinaryStyle::Summarized) {
        Ok(payload) => match payload.as_text() {
            Some(text) => text.to_string(),
            None => "null".to_string(),
        },
        Err(error) => format!("<unserializable: {error}>"),
    }
}

fn encode(value: &BridgeValue, style: BinaryStyle) -> Result<WirePayload> {
    match value {
        BridgeValue::Null => Ok(WirePayload::empty()),
        BridgeValue::Binary(bytes) => Ok(match style {
            BinaryStyle::Verbatim => WirePayload::binary(bytes.clone()),
            BinaryStyle::Summarized => {
                WirePayload::text(format!("<binary {} bytes>", bytes.len()))
            }
        }),
        BridgeValue::Text(text) => Ok(WirePayload::text(text.clone())),
        BridgeValue::Number(n) => Ok(WirePayload::text(n.to_string())),
        BridgeValue::Bool(b) => Ok(WirePayload::text(b.to_string())),
        BridgeValue::Timestamp(t) => Ok(WirePayload::text(
            t.to_rfc3339_opts(SecondsFormat::Millis, true),
        )),
        BridgeValue::Object(portable) => encode(&portable.to_bridge(), style),
        BridgeValue::Json(json) => {
            let body = serde_json::to_vec(json)
                .map_err(|e| BridgeError::protocol(format!("JSON encoding failed: {e}")))?;
            Ok(WirePayload::json(body))
        }
    }
}

/// Parse a timestamp previously serialized by this module.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| BridgeError::protocol(format!("malformed timestamp {text:?}: {e}")))
}

/// Text shape for serialized generic errors.
///
/// Distinct from [`crate::error::WireError`]: generic errors travel as
/// `{name, message, stack}`, bridge errors as `{domain, message, code,
/// stack}`. The two shapes must not be conflated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorText {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Serialize a generic error to the `{name, message, stack}` text shape.
///
/// The name is the error's unqualified type name; the stack carries the
/// source chain when one exists.
pub fn serialize_error<E: std::error::Error>(error: &E) -> Result<WirePayload> {
    let name = std::any::type_name::<E>()
        .rsplit("::")
        .next()
        .unwrap_or("Error");
    let stack = error.source().map(|source| source.to_string());
    let text = ErrorText {
        name: name.to_string(),
        message: error.to_string(),
        stack,
    };
    let body = serde_json::to_vec(&text)
        .map_err(|e| BridgeError::protocol(format!("error encoding failed: {e}")))?;
    Ok(WirePayload::json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_null_has_no_payload() {
        let payload = serialize(&BridgeValue::Null).unwrap();
        assert!(payload.body.is_none());
    }

    #[test]
    fn test_binary_passes_through_unchanged() {
        let bytes = Bytes::from_static(&[0x00, 0xff, 0x10]);
        let payload = serialize(&BridgeValue::Binary(bytes.clone())).unwrap();
        assert_eq!(payload.content_type, ContentType::Binary);
        assert_eq!(payload.body, Some(bytes));
    }

    #[test]
    fn test_scalars_round_trip_as_text() {
        let text = serialize(&BridgeValue::from("hello")).unwrap();
        assert_eq!(text.content_type, ContentType::Text);
        assert_eq!(text.as_text(), Some("hello"));

        let number = serialize(&BridgeValue::from(2.5)).unwrap();
        assert_eq!(number.as_text().unwrap().parse::<f64>().unwrap(), 2.5);

        let flag = serialize(&BridgeValue::from(true)).unwrap();
        assert_eq!(flag.as_text().unwrap().parse::<bool>().unwrap(), true);
    }

    #[test]
    fn test_timestamp_round_trips_to_encoded_precision() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
            + chrono::Duration::milliseconds(589);
        let payload = serialize(&BridgeValue::from(instant)).unwrap();

        let parsed = parse_timestamp(payload.as_text().unwrap()).unwrap();
        assert_eq!(parsed, instant);
    }

    #[test]
    fn test_portable_values_recurse() {
        struct Coordinates {
            lat: f64,
            lon: f64,
        }

        impl Portable for Coordinates {
            fn to_bridge(&self) -> BridgeValue {
                BridgeValue::Json(serde_json::json!({
                    "lat": self.lat,
                    "lon": self.lon,
                }))
            }
        }

        let value = BridgeValue::Object(Arc::new(Coordinates {
            lat: 59.33,
            lon: 18.06,
        }));
        let payload = serialize(&value).unwrap();
        assert_eq!(payload.content_type, ContentType::Json);

        let decoded: serde_json::Value =
            serde_json::from_slice(payload.body.as_deref().unwrap()).unwrap();
        assert_eq!(decoded["lat"], 59.33);
        assert_eq!(decoded["lon"], 18.06);
    }

    #[test]
    fn test_json_fallback() {
        let payload = serialize(&BridgeValue::Json(serde_json::json!([1, 2, 3]))).unwrap();
        assert_eq!(payload.content_type, ContentType::Json);
        assert_eq!(payload.as_text(), Some("[1,2,3]"));
    }

    #[test]
    fn test_describe_summarizes_binary_only() {
        let binary = BridgeValue::Binary(Bytes::from(vec![0u8; 512]));
        assert_eq!(describe(&binary), "<binary 512 bytes>");

        // Every other branch renders its wire form.
        assert_eq!(describe(&BridgeValue::from("plain")), "plain");
        assert_eq!(describe(&BridgeValue::Null), "null");
        assert_eq!(
            describe(&BridgeValue::Json(serde_json::json!({"a": 1}))),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn test_error_text_shape() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let payload = serialize_error(&io).unwrap();

        let text: ErrorText =
            serde_json::from_slice(payload.body.as_deref().unwrap()).unwrap();
        assert_eq!(text.name, "Error");
        assert_eq!(text.message, "gone");
        // No `domain` or `code` field: this is not the BridgeError shape.
        let raw: serde_json::Value =
            serde_json::from_slice(payload.body.as_deref().unwrap()).unwrap();
        assert!(raw.get("domain").is_none());
        assert!(raw.get("code").is_none());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
