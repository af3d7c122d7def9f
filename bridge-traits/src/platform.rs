//! Platform Resolution
//!
//! Determines which native host shell the content is running under. The
//! resolver is a pure function of the content origin: each production shell
//! serves content from a distinguishing address, and detection keys off
//! that signal alone. There is no error path — with no positive signal the
//! resolver falls back to the default production platform, which is always
//! safe because exactly two production hosts exist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host the Android shell serves content from.
pub const ANDROID_CONTENT_HOST: &str = "appassets.androidplatform.net";

/// Scheme the iOS shell serves content from.
pub const IOS_CONTENT_SCHEME: &str = "app";

/// Native host environment the content runs under.
///
/// Resolved once per process lifetime. `Test` is never produced by
/// [`Platform::resolve`]; it is selected explicitly when wiring an
/// injected test channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Android WebView shell.
    Android,
    /// iOS WKWebView shell.
    Ios,
    /// Injected test environment.
    Test,
}

impl Platform {
    /// Fallback when no positive signal is present.
    pub const DEFAULT: Platform = Platform::Android;

    /// Resolve the platform from the content origin.
    ///
    /// Deterministic and side-effect free. The iOS scheme is checked
    /// first, then the Android content host; anything else resolves to
    /// [`Platform::DEFAULT`].
    pub fn resolve(origin: &str) -> Platform {
        let origin = origin.trim();
        let ios_prefix = format!("{IOS_CONTENT_SCHEME}://");
        if origin.starts_with(&ios_prefix) {
            return Platform::Ios;
        }
        if origin.contains(ANDROID_CONTENT_HOST) {
            return Platform::Android;
        }
        Platform::DEFAULT
    }

    /// Identifier string used for logging and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Test => "test",
        }
    }

    /// Parse a platform from its identifier string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "android" => Some(Platform::Android),
            "ios" => Some(Platform::Ios),
            "test" => Some(Platform::Test),
            _ => None,
        }
    }

    /// True for the two shipped host shells.
    pub fn is_production(&self) -> bool {
        !matches!(self, Platform::Test)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
