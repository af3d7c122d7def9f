//! # Permission Request Flow
//!
//! Two-phase, permission-gated authorization against the host's permission
//! broker. A request round resolves every permission to granted, denied,
//! or requires-justification; the optional justification flow decides
//! whether a single justified re-request is issued or the pending entries
//! are denied locally.
//!
//! ## Usage
//!
//! ```ignore
//! use core_permissions::{PermissionId, PermissionRequest};
//!
//! # async fn example(client: &dyn bridge_traits::BridgeClient) -> bridge_traits::Result<()> {
//! let result = PermissionRequest::new(vec![PermissionId(4), PermissionId(9)])?
//!     .with_justification(|| async { prompt_user_for_justification().await })
//!     .request(client)
//!     .await?;
//!
//! if result.is_all_granted() {
//!     // proceed
//! }
//! # Ok(())
//! # }
//! ```

pub mod request;
pub mod types;

pub use request::{JustificationHandler, PermissionRequest, PERMISSIONS_CAPABILITY};
pub use types::{PermissionGrantResult, PermissionId, PermissionState};
