//! Host Channels
//!
//! One arm per host platform, each implementing the same two operations:
//! resolve the bridge endpoint and produce the shared-secret header value.
//! Both are read fresh on every call — the shells may rotate the local
//! port or the secret at any time, so nothing here is cached.

use std::env;
use std::fmt;

use bridge_traits::{BridgeError, Platform, Result};

/// Header carrying the shared secret. The sole authentication mechanism.
pub const AUTH_HEADER: &str = "X-HostBridge-Auth";

/// Variable the Android shell publishes its loopback port under.
pub const PORT_VAR: &str = "HOSTBRIDGE_SERVICE_PORT";

/// Variable the iOS shell publishes its full endpoint under.
pub const ENDPOINT_VAR: &str = "HOSTBRIDGE_SERVICE_ENDPOINT";

/// Variable both shells publish the shared secret under.
pub const TOKEN_VAR: &str = "HOSTBRIDGE_AUTH_TOKEN";

/// Shared-secret header value.
///
/// `Debug` redacts the value so the secret cannot leak through logging.
pub struct AuthSecret(String);

impl AuthSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw value, for header injection only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthSecret").field(&"[REDACTED]").finish()
    }
}

/// Channel to one host shell.
///
/// A closed set: the two production shells plus an injected test arm.
#[derive(Debug, Clone)]
pub enum HostChannel {
    Android(AndroidChannel),
    Ios(IosChannel),
    Test(TestChannel),
}

/// Android shell: loopback HTTP on a port published per process.
#[derive(Debug, Clone, Default)]
pub struct AndroidChannel;

/// iOS shell: full endpoint published per process.
#[derive(Debug, Clone, Default)]
pub struct IosChannel;

/// Fixed endpoint and secret for tests.
#[derive(Debug, Clone)]
pub struct TestChannel {
    endpoint: String,
    secret: String,
}

impl HostChannel {
    /// Channel for a production platform.
    ///
    /// The test platform carries no host-published configuration, so it
    /// must be constructed explicitly through [`HostChannel::test`].
    pub fn for_platform(platform: Platform) -> Result<Self> {
        match platform {
            Platform::Android => Ok(HostChannel::Android(AndroidChannel)),
            Platform::Ios => Ok(HostChannel::Ios(IosChannel)),
            Platform::Test => Err(BridgeError::protocol(
                "test platform requires an explicitly constructed channel",
            )),
        }
    }

    /// Channel with a fixed endpoint and secret, for tests.
    pub fn test(endpoint: impl Into<String>, secret: impl Into<String>) -> Self {
        HostChannel::Test(TestChannel {
            endpoint: endpoint.into(),
            secret: secret.into(),
        })
    }

    pub fn platform(&self) -> Platform {
        match self {
            HostChannel::Android(_) => Platform::Android,
            HostChannel::Ios(_) => Platform::Ios,
            HostChannel::Test(_) => Platform::Test,
        }
    }

    /// Resolve the bridge endpoint for the current call.
    pub fn resolve_endpoint(&self) -> Result<String> {
        match self {
            HostChannel::Android(_) => {
                let port = env::var(PORT_VAR).map_err(|_| {
                    BridgeError::transport(format!("host did not publish {PORT_VAR}"))
                })?;
                let port: u16 = port.trim().parse().map_err(|_| {
                    BridgeError::transport(format!("{PORT_VAR} is not a port: {port:?}"))
                })?;
                Ok(format!("http://127.0.0.1:{port}"))
            }
            HostChannel::Ios(_) => {
                let endpoint = env::var(ENDPOINT_VAR).map_err(|_| {
                    BridgeError::transport(format!("host did not publish {ENDPOINT_VAR}"))
                })?;
                Ok(endpoint.trim().trim_end_matches('/').to_string())
            }
            HostChannel::Test(channel) => Ok(channel.endpoint.clone()),
        }
    }

    /// Obtain the shared secret for the current call.
    pub fn auth_secret(&self) -> Result<AuthSecret> {
        match self {
            HostChannel::Android(_) | HostChannel::Ios(_) => {
                let secret = env::var(TOKEN_VAR).map_err(|_| {
                    BridgeError::transport(format!("host did not publish {TOKEN_VAR}"))
                })?;
                Ok(AuthSecret::new(secret))
            }
            HostChannel::Test(channel) => Ok(AuthSecret::new(channel.secret.clone())),
        }
    }
}
