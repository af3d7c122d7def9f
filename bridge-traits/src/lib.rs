//! # Bridge Protocol Contracts
//!
//! Shared contracts and wire types for the host capability bridge: the
//! protocol layer that lets sandboxed content in an embedded web engine
//! invoke native host capabilities without ever holding a native object
//! reference.
//!
//! ## Overview
//!
//! Everything a transport or a capability consumer needs lives here:
//!
//! - [`BridgeClient`](client::BridgeClient) - the request/response contract
//!   every transport implements
//! - [`BridgeRequest`](client::BridgeRequest) / [`BridgeResponse`](response::BridgeResponse) -
//!   one capability invocation and its typed-reader response
//! - [`BridgeError`](error::BridgeError) - the single error model, with its
//!   `{domain, message, code, stack}` wire shape
//! - [`CallbackRegistry`](callbacks::CallbackRegistry) - the process-wide
//!   table behind native-to-content push events
//! - [`payload`] - the wire serializer (one dispatch table, transport and
//!   logging variants)
//! - [`Platform`](platform::Platform) - closed host enumeration and its
//!   resolver
//! - [`LoggerSink`](log::LoggerSink) - forwards structured logs to host
//!   logging pipelines
//!
//! ## Request flow
//!
//! A capability consumer serializes its arguments through [`payload`],
//! executes a [`BridgeRequest`](client::BridgeRequest) through a
//! [`BridgeClient`](client::BridgeClient), and reads the typed
//! [`BridgeResponse`](response::BridgeResponse). Push notifications go the
//! other way: the consumer registers a handler in the
//! [`CallbackRegistry`](callbacks::CallbackRegistry), ships the returned id
//! to the host inside a request payload, and the host later calls
//! [`dispatch_host_callback`](callbacks::dispatch_host_callback) to deliver.
//!
//! ## Thread Safety
//!
//! The hosting engines schedule content on a single cooperative loop, but
//! every contract here still requires `Send + Sync` so clients can be shared
//! across async tasks; the callback table is a locked map rather than an
//! ambient global.

pub mod callbacks;
pub mod client;
pub mod content;
pub mod error;
pub mod log;
pub mod payload;
pub mod platform;
pub mod response;
pub mod version;

pub use error::{BridgeError, Result, WireError};

// Re-export commonly used types
pub use callbacks::{dispatch_host_callback, CallbackHandler, CallbackId, CallbackRegistry};
pub use client::{route, BridgeClient, BridgeRequest, ROUTE_PREFIX};
pub use content::ContentType;
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use payload::{BridgeValue, Portable, WirePayload};
pub use platform::Platform;
pub use response::{BridgeResponse, Headers};
pub use version::Version;
