//! # HTTP Bridge Transport
//!
//! Concrete [`BridgeClient`](bridge_traits::BridgeClient) implementation:
//! a single POST per capability call against the local bridge server each
//! host shell runs.
//!
//! ## Overview
//!
//! - [`HostChannel`] - closed per-platform set resolving the endpoint and
//!   the shared-secret header value, fresh on every call
//! - [`HttpBridgeClient`] - reqwest-based transport with host error
//!   decoding and transport/application error separation
//!
//! ## Wire protocol
//!
//! `POST {endpoint}/api/{capability}{method}` with `Content-Type` and the
//! `X-HostBridge-Auth` secret header. Status >= 400 carries a JSON
//! `{domain, message, code, stack?}` error body; success carries the raw
//! result bytes.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_http::{HostChannel, HttpBridgeClient};
//! use bridge_traits::{BridgeClient, BridgeRequest, Platform};
//!
//! # async fn example() -> bridge_traits::Result<()> {
//! let channel = HostChannel::for_platform(Platform::resolve(origin))?;
//! let client = HttpBridgeClient::new(channel);
//! let response = client.execute(BridgeRequest::new("runtime", "/info")).await?;
//! # Ok(())
//! # }
//! ```

mod channel;
mod client;

pub use channel::{AndroidChannel, AuthSecret, HostChannel, IosChannel, TestChannel, AUTH_HEADER};
pub use client::HttpBridgeClient;
