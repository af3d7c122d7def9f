//! Bridge Error Model
//!
//! A single error type flows through every layer of the bridge: transport
//! failures, application errors decoded from the host, and protocol misuse
//! detected locally. Errors carry a *domain* string classifying the failing
//! subsystem, a human-readable message, a numeric code (0 = unspecified),
//! an optional cause, and an optional remote stack captured from the wire.
//!
//! The wire shape is `{domain, message, code, stack?}` and must round-trip
//! exactly: an error decoded from a host response and re-encoded produces
//! the same JSON object.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Well-known error domains used by the bridge core itself.
///
/// Capability implementations are free to introduce their own domains; the
/// host encodes its domain into the error body and it is preserved verbatim.
pub mod domains {
    /// Local transport failures: the host could not be reached at all.
    pub const TRANSPORT: &str = "BridgeTransport";
    /// Protocol misuse detected on the content side (bad route, empty
    /// permission set, malformed callback payload).
    pub const PROTOCOL: &str = "BridgeProtocol";
    /// Fallback domain for values that carry no domain of their own.
    pub const UNKNOWN: &str = "Unknown";
}

/// Numeric code meaning "no specific code assigned".
pub const CODE_UNSPECIFIED: i64 = 0;

/// Error raised by bridge operations.
///
/// Immutable after construction. The builder-style constructors exist so a
/// failure site can attach a code or cause without mutating an existing
/// error.
#[derive(Error, Debug, Clone)]
#[error("[{domain}] {message} (code {code})")]
pub struct BridgeError {
    domain: String,
    message: String,
    code: i64,
    stack: Option<String>,
    #[source]
    cause: Option<Box<BridgeError>>,
}

impl BridgeError {
    /// Create an error in an explicit domain.
    pub fn new(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            message: message.into(),
            code: CODE_UNSPECIFIED,
            stack: None,
            cause: None,
        }
    }

    /// Create a transport-domain error ("could not talk to the host").
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(domains::TRANSPORT, message)
    }

    /// Create a protocol-misuse error detected on the content side.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(domains::PROTOCOL, message)
    }

    /// Attach a numeric code.
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Attach a stack text (normally only set when decoding from the wire).
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attach a causing error.
    pub fn caused_by(mut self, cause: BridgeError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn cause(&self) -> Option<&BridgeError> {
        self.cause.as_deref()
    }

    /// Encode into the wire shape.
    pub fn to_wire(&self) -> WireError {
        WireError {
            domain: self.domain.clone(),
            message: self.message.clone(),
            code: self.code,
            stack: self.stack.clone(),
        }
    }

    /// Rebuild an error from its wire shape.
    pub fn from_wire(wire: WireError) -> Self {
        Self {
            domain: wire.domain,
            message: wire.message,
            code: wire.code,
            stack: wire.stack,
            cause: None,
        }
    }

    /// Decode an error from a JSON-encoded wire body.
    ///
    /// Used by the transport when the host answers with status >= 400.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let wire: WireError = serde_json::from_slice(body).map_err(|e| {
            BridgeError::protocol(format!("undecodable error body: {e}"))
        })?;
        Ok(Self::from_wire(wire))
    }

    /// Normalize an arbitrary JSON value into a `BridgeError`.
    ///
    /// Accepted inputs, in order:
    /// - a plain string becomes an `Unknown`-domain error with that message;
    /// - an object matching the wire shape round-trips into a full error;
    /// - anything else is logged and replaced with a generic error so an
    ///   untyped value never escapes to callers.
    pub fn wrap(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(message) => Self::new(domains::UNKNOWN, message),
            other => match serde_json::from_value::<WireError>(other.clone()) {
                Ok(wire) => Self::from_wire(wire),
                Err(_) => {
                    tracing::warn!(value = %other, "wrapping unrecognized error value");
                    Self::new(domains::UNKNOWN, "unrecognized error value")
                }
            },
        }
    }
}

/// JSON wire representation of a [`BridgeError`].
///
/// Note this is distinct from the `{name, message, stack}` shape used when
/// serializing generic errors as payloads (see [`crate::payload`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    pub domain: String,
    pub message: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (code {})", self.domain, self.message, self.code)
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
