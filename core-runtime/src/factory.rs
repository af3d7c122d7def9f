//! Capability Factory
//!
//! Produces the bridge client for a platform: constructed lazily on the
//! first request for that platform, then cached so every capability
//! consumer on the same platform shares one instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use bridge_http::{HostChannel, HttpBridgeClient};
use bridge_traits::{BridgeClient, Platform, Result};

/// One cached bridge client per platform.
pub struct CapabilityFactory {
    clients: Mutex<HashMap<Platform, Arc<dyn BridgeClient>>>,
}

impl CapabilityFactory {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Inject a prebuilt client, keyed by its own platform.
    ///
    /// The seam tests and the test platform use; a registered client wins
    /// over lazy construction.
    pub fn register(&self, client: Arc<dyn BridgeClient>) {
        let mut clients = self.clients.lock().expect("factory cache poisoned");
        clients.insert(client.platform(), client);
    }

    /// The client for `platform`, constructing and caching it on first use.
    pub fn client(&self, platform: Platform) -> Result<Arc<dyn BridgeClient>> {
        let mut clients = self.clients.lock().expect("factory cache poisoned");
        if let Some(client) = clients.get(&platform) {
            return Ok(Arc::clone(client));
        }

        let channel = HostChannel::for_platform(platform)?;
        let client: Arc<dyn BridgeClient> = Arc::new(HttpBridgeClient::new(channel));
        clients.insert(platform, Arc::clone(&client));
        Ok(client)
    }
}

impl Default for CapabilityFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CapabilityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached: Vec<Platform> = self
            .clients
            .lock()
            .expect("factory cache poisoned")
            .keys()
            .copied()
            .collect();
        f.debug_struct("CapabilityFactory")
            .field("cached", &cached)
            .finish()
    }
}
