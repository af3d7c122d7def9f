//! Bridge Context
//!
//! The dependency-injection root handed to every capability consumer:
//! resolved platform, capability factory, and logger. Also owns the
//! memoized runtime info fetch and pause/resume handler registration,
//! which rides on the callback registry plus a notification to the native
//! side so the host can track (and later free) its own bookkeeping.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;

use bridge_traits::{
    callbacks::{CallbackHandler, CallbackId},
    BridgeClient, BridgeRequest, ContentType, LoggerSink, Platform, Result, Version,
};

use crate::factory::CapabilityFactory;

/// Capability id of the host runtime surface.
pub const RUNTIME_CAPABILITY: &str = "runtime";

const INFO_METHOD: &str = "/info";
const ADD_PAUSE_LISTENER_METHOD: &str = "/addPauseListener";
const REMOVE_PAUSE_LISTENER_METHOD: &str = "/removePauseListener";

/// Host runtime description, fetched once per context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub version: String,
    pub debug: bool,
}

impl RuntimeInfo {
    /// The host version in comparable form.
    pub fn parsed_version(&self) -> Version {
        Version::parse(&self.version)
    }
}

/// Process-wide dependency root.
pub struct Context {
    platform: Platform,
    factory: Arc<CapabilityFactory>,
    logger: Arc<dyn LoggerSink>,
    runtime_info: OnceCell<RuntimeInfo>,
}

impl Context {
    pub fn new(
        platform: Platform,
        factory: Arc<CapabilityFactory>,
        logger: Arc<dyn LoggerSink>,
    ) -> Self {
        Self {
            platform,
            factory,
            logger,
            runtime_info: OnceCell::new(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn logger(&self) -> &Arc<dyn LoggerSink> {
        &self.logger
    }

    pub fn factory(&self) -> &Arc<CapabilityFactory> {
        &self.factory
    }

    /// The bridge client for this context's platform.
    pub fn client(&self) -> Result<Arc<dyn BridgeClient>> {
        self.factory.client(self.platform)
    }

    /// Host runtime info: fetched on first call, memoized for the
    /// context's lifetime.
    pub async fn runtime_info(&self) -> Result<&RuntimeInfo> {
        self.runtime_info
            .get_or_try_init(|| async {
                let response = self
                    .client()?
                    .execute(BridgeRequest::new(RUNTIME_CAPABILITY, INFO_METHOD))
                    .await?;
                response.json::<RuntimeInfo>()
            })
            .await
    }

    /// Register a pause/resume handler the host can push lifecycle
    /// transitions to.
    ///
    /// The callback id is created locally and shipped to the host so it
    /// knows where to deliver; if that notification fails the local entry
    /// is rolled back and the error surfaces.
    pub async fn register_pause_handler(&self, handler: CallbackHandler) -> Result<CallbackId> {
        let client = self.client()?;
        let id = client.create_callback_context(handler);

        match self
            .notify_listener(&client, ADD_PAUSE_LISTENER_METHOD, &id)
            .await
        {
            Ok(()) => Ok(id),
            Err(error) => {
                client.release_callback(&id);
                Err(error)
            }
        }
    }

    /// Unregister a pause/resume handler.
    ///
    /// Notifies the native side first so it can free its bookkeeping, then
    /// releases the local callback; the local entry is released even when
    /// the notification fails.
    pub async fn unregister_pause_handler(&self, id: CallbackId) -> Result<()> {
        let client = self.client()?;
        let outcome = self
            .notify_listener(&client, REMOVE_PAUSE_LISTENER_METHOD, &id)
            .await;
        client.release_callback(&id);
        outcome
    }

    async fn notify_listener(
        &self,
        client: &Arc<dyn BridgeClient>,
        method: &str,
        id: &CallbackId,
    ) -> Result<()> {
        let body = serde_json::to_vec(&serde_json::json!({ "callbackId": id.as_str() }))
            .expect("listener body is always encodable");
        client
            .execute(
                BridgeRequest::new(RUNTIME_CAPABILITY, method)
                    .content_type(ContentType::Json)
                    .body(body),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{BridgeResponse, CallbackRegistry, ConsoleLogger};
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mock! {
        Client {}

        #[async_trait]
        impl BridgeClient for Client {
            fn platform(&self) -> Platform;
            async fn execute(&self, request: BridgeRequest) -> Result<BridgeResponse>;
            fn create_callback_context(&self, handler: CallbackHandler) -> CallbackId;
            fn release_callback(&self, id: &CallbackId);
        }
    }

    fn context_with(client: MockClient) -> Context {
        let factory = Arc::new(CapabilityFactory::new());
        factory.register(Arc::new(client));
        Context::new(
            Platform::Test,
            factory,
            Arc::new(ConsoleLogger::default()),
        )
    }

    fn info_response() -> BridgeResponse {
        BridgeResponse::new(
            200,
            r#"{"version": "3.4.1", "debug": true}"#,
            "Content-Type: application/json",
        )
    }

    #[tokio::test]
    async fn test_runtime_info_is_fetched_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut client = MockClient::new();
        client.expect_platform().return_const(Platform::Test);
        client
            .expect_execute()
            .withf(|request| request.route().unwrap() == "/api/runtime/info")
            .returning(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(info_response())
            });

        let context = context_with(client);
        let first = context.runtime_info().await.unwrap().clone();
        let second = context.runtime_info().await.unwrap().clone();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(first.parsed_version(), Version::new(3, 4, 1));
        assert!(first.debug);
    }

    #[tokio::test]
    async fn test_pause_handler_round_trip() {
        let registry = CallbackRegistry::global();

        let mut client = MockClient::new();
        client.expect_platform().return_const(Platform::Test);
        client
            .expect_create_callback_context()
            .returning(|handler| CallbackRegistry::global().create_callback(handler));
        client
            .expect_release_callback()
            .returning(|id| CallbackRegistry::global().release_callback(id));
        client
            .expect_execute()
            .withf(|request| {
                let route = request.route().unwrap();
                route == "/api/runtime/addPauseListener"
                    || route == "/api/runtime/removePauseListener"
            })
            .times(2)
            .returning(|_| Ok(BridgeResponse::new(200, "", "")));

        let context = context_with(client);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let id = context
            .register_pause_handler(Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .await
            .unwrap();

        assert!(registry.dispatch(id.as_str(), "paused"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        context.unregister_pause_handler(id.clone()).await.unwrap();
        assert!(!registry.dispatch(id.as_str(), "resumed"));
    }

    #[tokio::test]
    async fn test_failed_registration_rolls_back_callback() {
        let mut client = MockClient::new();
        client.expect_platform().return_const(Platform::Test);
        client
            .expect_create_callback_context()
            .returning(|handler| CallbackRegistry::global().create_callback(handler));
        client
            .expect_release_callback()
            .times(1)
            .returning(|id| CallbackRegistry::global().release_callback(id));
        client
            .expect_execute()
            .returning(|_| Err(bridge_traits::BridgeError::transport("host gone")));

        let context = context_with(client);
        let error = context
            .register_pause_handler(Arc::new(|_| {}))
            .await
            .unwrap_err();

        assert_eq!(error.domain(), bridge_traits::error::domains::TRANSPORT);
    }
}
