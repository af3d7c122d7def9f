//! Host version numbers.
//!
//! Three-component versions ordered lexicographically by
//! major, then minor, then patch. Parsing never fails: unparsable
//! components default to 0.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `(major, minor, patch)` version.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string. Missing or unparsable segments
    /// default to 0, so `"4.x.1"` parses as `4.0.0`.
    pub fn parse(text: &str) -> Self {
        let mut segments = text.trim().splitn(3, '.');
        let mut segment = || {
            segments
                .next()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };
        Self {
            major: segment(),
            minor: segment(),
            patch: segment(),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}
