//! # Capability Base
//!
//! Building blocks for capability consumers: a validated
//! [`CapabilityId`], the [`CapabilityBase`] invoke/callback helpers, and
//! the route-bound [`BridgeFn`].
//!
//! A concrete capability wraps a base and exposes typed methods over it:
//!
//! ```ignore
//! use core_capability::{CapabilityBase, CapabilityId};
//! use bridge_traits::{BridgeValue, Result};
//!
//! struct Geolocation {
//!     base: CapabilityBase,
//! }
//!
//! impl Geolocation {
//!     fn new(client: std::sync::Arc<dyn bridge_traits::BridgeClient>) -> Result<Self> {
//!         Ok(Self {
//!             base: CapabilityBase::new(CapabilityId::new("geo")?, client),
//!         })
//!     }
//!
//!     async fn current_position(&self) -> Result<String> {
//!         self.base.trigger("/current").await?.text()
//!     }
//! }
//! ```

pub mod base;
pub mod id;

pub use base::{BridgeFn, CapabilityBase};
pub use id::CapabilityId;
