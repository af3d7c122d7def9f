//! Bridge Client Abstraction
//!
//! The contract every transport must satisfy: execute a single request
//! against a named capability and method, and manage callback contexts so
//! transport and callback lifecycle share one authorization boundary.

use async_trait::async_trait;
use bytes::Bytes;

use crate::callbacks::{CallbackHandler, CallbackId};
use crate::content::ContentType;
use crate::error::{BridgeError, Result};
use crate::payload::WirePayload;
use crate::platform::Platform;
use crate::response::BridgeResponse;

/// Fixed prefix every capability route is anchored under.
pub const ROUTE_PREFIX: &str = "/api";

/// Build the wire route for a capability method.
///
/// The method path must begin with `/`; the result is
/// `/api/{capability}{method}`.
pub fn route(capability: &str, method: &str) -> Result<String> {
    if !method.starts_with('/') {
        return Err(BridgeError::protocol(format!(
            "method path must start with '/': {method:?}"
        )));
    }
    Ok(format!("{ROUTE_PREFIX}/{capability}{method}"))
}

/// A single capability invocation. Constructed per call, never persisted.
#[derive(Debug, Clone)]
pub struct BridgeRequest {
    pub capability: String,
    pub method: String,
    pub content_type: Option<ContentType>,
    pub body: Option<Bytes>,
}

impl BridgeRequest {
    pub fn new(capability: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            method: method.into(),
            content_type: None,
            body: None,
        }
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a serialized payload, taking both its label and its bytes.
    pub fn payload(mut self, payload: WirePayload) -> Self {
        self.content_type = Some(payload.content_type);
        self.body = payload.body;
        self
    }

    /// The wire route this request addresses.
    pub fn route(&self) -> Result<String> {
        route(&self.capability, &self.method)
    }
}

/// Executes capability requests against the native host.
///
/// One call, one response; this layer never retries. Callback context
/// creation and release delegate to the process-wide registry but live on
/// the client so every capability consumer works through a single
/// authorization boundary.
#[async_trait]
pub trait BridgeClient: Send + Sync {
    /// The platform this client talks to.
    fn platform(&self) -> Platform;

    /// Execute a single request.
    ///
    /// # Errors
    ///
    /// - transport-domain error when the host cannot be reached at all;
    /// - the decoded wire error when the host answers with status >= 400;
    /// - protocol-domain error on a malformed route.
    async fn execute(&self, request: BridgeRequest) -> Result<BridgeResponse>;

    /// Register a handler the host can push events to, returning its id.
    fn create_callback_context(&self, handler: CallbackHandler) -> CallbackId;

    /// Release a callback context. Idempotent.
    fn release_callback(&self, id: &CallbackId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_construction() {
        assert_eq!(route("geo", "/subscribe").unwrap(), "/api/geo/subscribe");
    }

    #[test]
    fn test_route_rejects_unanchored_method() {
        let error = route("geo", "subscribe").unwrap_err();
        assert_eq!(error.domain(), crate::error::domains::PROTOCOL);
    }

    #[test]
    fn test_request_defaults() {
        let request = BridgeRequest::new("runtime", "/info");
        assert!(request.content_type.is_none());
        assert!(request.body.is_none());
        assert_eq!(request.route().unwrap(), "/api/runtime/info");
    }

    #[test]
    fn test_request_payload_sets_label_and_body() {
        let payload = WirePayload::text("42");
        let request = BridgeRequest::new("geo", "/watch").payload(payload);
        assert_eq!(request.content_type, Some(ContentType::Text));
        assert_eq!(request.body.as_deref(), Some(&b"42"[..]));
    }
}
