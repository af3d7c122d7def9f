//! Capability identifiers.
//!
//! A capability id becomes part of the wire route, so the allowed alphabet
//! is restricted to letters, digits, dots, and hyphens.

use std::fmt;

use bridge_traits::{BridgeError, Result};

/// Fixed, stable identifier of a capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityId(String);

impl CapabilityId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return Err(BridgeError::protocol(format!(
                "invalid capability id {id:?}: only letters, digits, dots and hyphens are allowed"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for CapabilityId {
    type Error = BridgeError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_route_safe_ids() {
        for id in ["geo", "device.info", "media-capture", "v2.geo-fine"] {
            assert!(CapabilityId::new(id).is_ok(), "{id} should be accepted");
        }
    }

    #[test]
    fn test_rejects_route_breaking_ids() {
        for id in ["", "geo/fine", "geo fine", "geo?x", "geo\n"] {
            assert!(CapabilityId::new(id).is_err(), "{id:?} should be rejected");
        }
    }
}
