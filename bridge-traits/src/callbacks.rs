//! Callback Registry
//!
//! A process-wide table mapping opaque callback identifiers to locally
//! registered handlers. This is the only channel through which the native
//! host can push data into content outside of responding to a request:
//! content registers a handler, sends the returned id to the host inside a
//! request payload, and the host later invokes the fixed entry point
//! [`dispatch_host_callback`] with that id to deliver data.
//!
//! The registry is created lazily on first use and never torn down while
//! the process lives. Identifiers are random 128-bit UUIDs, so an id is
//! never reused while live. Handlers are standing subscriptions: the host
//! may invoke the same id any number of times until it is released.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use uuid::Uuid;

/// Handler invoked with exactly the string payload the host supplied.
pub type CallbackHandler = Arc<dyn Fn(String) + Send + Sync>;

/// Opaque callback identifier handed to the native host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackId(String);

impl CallbackId {
    fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-wide callback table.
///
/// Bridge clients hold a reference obtained from [`CallbackRegistry::global`]
/// and delegate their callback lifecycle methods here; the host-facing
/// dispatch path goes through [`dispatch_host_callback`], which resolves the
/// same instance. Constructing a private registry is possible for tests.
pub struct CallbackRegistry {
    entries: Mutex<HashMap<String, CallbackHandler>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The per-process registry instance, created on first use.
    pub fn global() -> &'static CallbackRegistry {
        static GLOBAL: OnceLock<CallbackRegistry> = OnceLock::new();
        GLOBAL.get_or_init(CallbackRegistry::new)
    }

    /// Store a handler and return a fresh identifier for it.
    pub fn create_callback(&self, handler: CallbackHandler) -> CallbackId {
        let id = CallbackId::fresh();
        let mut entries = self.entries.lock().expect("callback table poisoned");
        let previous = entries.insert(id.0.clone(), handler);
        debug_assert!(previous.is_none(), "uuid collision in callback table");
        id
    }

    /// Remove a handler. Releasing an absent id is a no-op.
    pub fn release_callback(&self, id: &CallbackId) {
        let mut entries = self.entries.lock().expect("callback table poisoned");
        entries.remove(&id.0);
    }

    /// Deliver `data` to the handler stored under `id`.
    ///
    /// Returns false when the id is unknown. The handler runs outside the
    /// table lock so it may itself create or release callbacks.
    pub fn dispatch(&self, id: &str, data: &str) -> bool {
        let handler = {
            let entries = self.entries.lock().expect("callback table poisoned");
            entries.get(id).cloned()
        };
        match handler {
            Some(handler) => {
                handler(data.to_string());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("callback table poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("entries", &self.len())
            .finish()
    }
}

/// The single fixed entry point the native host calls to push data back
/// into content.
///
/// Deliveries for unknown ids are dropped silently: there is no caller to
/// propagate to, only a push with nobody listening anymore.
pub fn dispatch_host_callback(id: &str, data: &str) {
    if !CallbackRegistry::global().dispatch(id, data) {
        tracing::debug!(callback_id = id, "dropping delivery for unknown callback id");
    }
}
