//! Workspace umbrella crate.
//!
//! Re-exports the individual bridge crates so host applications can depend
//! on `hostbridge-workspace` without wiring each crate individually.

pub use bridge_http;
pub use bridge_traits;
pub use core_capability;
pub use core_permissions;
pub use core_runtime;
