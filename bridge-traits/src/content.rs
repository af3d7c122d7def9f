//! Wire media type labels.
//!
//! Content types label the body of a bridge request or response; they do not
//! affect framing. The closed set mirrors what the hosts understand.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media type of a bridge payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// Plain text (stringified scalars, timestamps).
    Text,
    /// Structured JSON text.
    Json,
    /// Executable script source.
    Script,
    /// Opaque binary. The default when nothing more specific is known.
    #[default]
    Binary,
    /// WebAssembly module bytes.
    Wasm,
}

impl ContentType {
    /// Canonical MIME string sent in the `Content-Type` header.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Text => "text/plain",
            ContentType::Json => "application/json",
            ContentType::Script => "text/javascript",
            ContentType::Binary => "application/octet-stream",
            ContentType::Wasm => "application/wasm",
        }
    }

    /// Parse a MIME string back into a label, ignoring parameters.
    ///
    /// Returns `None` for media types outside the closed set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence {
            "text/plain" => Some(ContentType::Text),
            "application/json" => Some(ContentType::Json),
            "text/javascript" | "application/javascript" => Some(ContentType::Script),
            "application/octet-stream" => Some(ContentType::Binary),
            "application/wasm" => Some(ContentType::Wasm),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime())
    }
}
