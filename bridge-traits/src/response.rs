//! Bridge Response
//!
//! Wraps the raw bytes, raw header block, and status code of a completed
//! bridge call and exposes typed readers over them. The raw header block is
//! newline-delimited `key: value` text exactly as the host produced it;
//! parsing preserves order and accumulates duplicate keys.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::content::ContentType;
use crate::error::{BridgeError, Result};

/// Response to a single bridge request.
#[derive(Debug, Clone)]
pub struct BridgeResponse {
    status: u16,
    content: Bytes,
    raw_headers: String,
}

impl BridgeResponse {
    pub fn new(status: u16, content: impl Into<Bytes>, raw_headers: impl Into<String>) -> Self {
        Self {
            status,
            content: content.into(),
            raw_headers: raw_headers.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// True exactly when the host reported an application error.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    /// Content type parsed from the header block, if the host labeled one.
    pub fn content_type(&self) -> Option<ContentType> {
        self.headers()
            .first("content-type")
            .and_then(ContentType::from_mime)
    }

    /// The raw header block as received.
    pub fn raw_headers(&self) -> &str {
        &self.raw_headers
    }

    /// Parse the header block into an ordered multimap.
    pub fn headers(&self) -> Headers {
        Headers::parse(&self.raw_headers)
    }

    /// Raw body bytes. Cheap to clone, the buffer is shared.
    pub fn bytes(&self) -> Bytes {
        self.content.clone()
    }

    /// Body decoded as UTF-8 text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.content.to_vec())
            .map_err(|e| BridgeError::protocol(format!("response body is not UTF-8: {e}")))
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.content)
            .map_err(|e| BridgeError::protocol(format!("response body is not valid JSON: {e}")))
    }

    /// Body decoded as a wire-shaped [`BridgeError`].
    pub fn error(&self) -> Result<BridgeError> {
        BridgeError::decode(&self.content)
    }
}

/// Ordered header multimap.
///
/// Keys keep their first-seen spelling and position; values for a repeated
/// key accumulate in arrival order. Lookups are ASCII case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Parse a newline-delimited `key: value` block.
    ///
    /// Lines split on the first colon; lines without a colon are skipped.
    /// Both `\n` and `\r\n` delimiters are accepted.
    pub fn parse(raw: &str) -> Self {
        let mut headers = Headers::default();
        for line in raw.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.append(name, value.trim());
        }
        headers
    }

    fn append(&mut self, name: &str, value: &str) {
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .entries
                .push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// All values recorded for `name`, in arrival order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// First value recorded for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}
