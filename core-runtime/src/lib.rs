//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the host bridge:
//! - [`Context`](context::Context) - the dependency-injection root handed
//!   to every capability consumer
//! - [`CapabilityFactory`](factory::CapabilityFactory) - one cached bridge
//!   client per platform
//! - Logging and tracing bootstrap with host sink mirroring
//!
//! ## Overview
//!
//! A process resolves its platform once, builds a context around it, and
//! hands that context to capability consumers. The context memoizes the
//! host runtime info and routes pause/resume lifecycle handlers through
//! the callback registry.

pub mod context;
pub mod error;
pub mod factory;
pub mod logging;

pub use context::{Context, RuntimeInfo, RUNTIME_CAPABILITY};
pub use error::{Error, Result};
pub use factory::CapabilityFactory;
pub use logging::{init_logging, LogFormat, LoggingConfig};
