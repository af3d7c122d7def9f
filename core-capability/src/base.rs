//! Capability consumer base.
//!
//! Every concrete capability owns a [`CapabilityBase`]: its stable id plus
//! the bridge client for the resolved platform. The base provides the
//! invoke and callback helpers so capability code never assembles routes
//! or touches the registry directly.

use std::sync::Arc;

use bridge_traits::{
    callbacks::{CallbackHandler, CallbackId},
    payload::{self, BridgeValue},
    BridgeClient, BridgeRequest, BridgeResponse, Result,
};

use crate::id::CapabilityId;

/// Shared plumbing for one capability.
#[derive(Clone)]
pub struct CapabilityBase {
    id: CapabilityId,
    client: Arc<dyn BridgeClient>,
}

impl CapabilityBase {
    pub fn new(id: CapabilityId, client: Arc<dyn BridgeClient>) -> Self {
        Self { id, client }
    }

    pub fn id(&self) -> &CapabilityId {
        &self.id
    }

    pub fn client(&self) -> &Arc<dyn BridgeClient> {
        &self.client
    }

    /// Invoke a method with a serialized argument value.
    pub async fn invoke(&self, method: &str, value: &BridgeValue) -> Result<BridgeResponse> {
        let wire = payload::serialize(value)?;
        let request = BridgeRequest::new(self.id.as_str(), method).payload(wire);
        self.client.execute(request).await
    }

    /// Invoke a bare trigger method, sending no body at all.
    pub async fn trigger(&self, method: &str) -> Result<BridgeResponse> {
        self.client
            .execute(BridgeRequest::new(self.id.as_str(), method))
            .await
    }

    /// Register a push handler scoped to this capability's client.
    pub fn create_callback(&self, handler: CallbackHandler) -> CallbackId {
        self.client.create_callback_context(handler)
    }

    /// Release a push handler. Idempotent.
    pub fn release_callback(&self, id: &CallbackId) {
        self.client.release_callback(id);
    }

    /// Register a push handler that expects JSON payloads of type `T`.
    ///
    /// A malformed delivery is logged and dropped: a push has no caller to
    /// propagate an error to.
    pub fn create_json_callback<T, F>(&self, handler: F) -> CallbackId
    where
        T: serde::de::DeserializeOwned,
        F: Fn(T) + Send + Sync + 'static,
    {
        let capability = self.id.clone();
        self.create_callback(Arc::new(move |data| {
            match serde_json::from_str::<T>(&data) {
                Ok(value) => handler(value),
                Err(error) => {
                    tracing::warn!(
                        capability = %capability,
                        %error,
                        "dropping malformed callback payload"
                    );
                }
            }
        }))
    }

    /// Build a reusable function bound to one method route, for
    /// capabilities that expose many small sub-operations over the same
    /// transport.
    pub fn bridge_fn(&self, method: impl Into<String>) -> BridgeFn {
        BridgeFn {
            id: self.id.clone(),
            method: method.into(),
            client: Arc::clone(&self.client),
        }
    }
}

/// A capability method bound to its route and serializer.
#[derive(Clone)]
pub struct BridgeFn {
    id: CapabilityId,
    method: String,
    client: Arc<dyn BridgeClient>,
}

impl BridgeFn {
    pub async fn call(&self, value: &BridgeValue) -> Result<BridgeResponse> {
        let wire = payload::serialize(value)?;
        let request = BridgeRequest::new(self.id.as_str(), &self.method).payload(wire);
        self.client.execute(request).await
    }

    /// The wire route this function addresses.
    pub fn route(&self) -> Result<String> {
        bridge_traits::route(self.id.as_str(), &self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{ContentType, Platform};
    use mockall::mock;

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

    fn ok_response() -> BridgeResponse {
        BridgeResponse::new(200, "", "")
    }

    #[tokio::test]
    async fn test_invoke_routes_under_own_id() {
        let mut client = MockClient::new();
        client
            .expect_execute()
            .withf(|request| {
                request.route().unwrap() == "/api/geo/current"
                    && request.content_type == Some(ContentType::Text)
                    && request.body.as_deref() == Some(&b"fine"[..])
            })
            .times(1)
            .returning(|_| Ok(ok_response()));

        let base = CapabilityBase::new(CapabilityId::new("geo").unwrap(), Arc::new(client));
        base.invoke("/current", &BridgeValue::from("fine"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_trigger_sends_no_body() {
        let mut client = MockClient::new();
        client
            .expect_execute()
            .withf(|request| request.body.is_none() && request.content_type.is_none())
            .times(1)
            .returning(|_| Ok(ok_response()));

        let base = CapabilityBase::new(CapabilityId::new("geo").unwrap(), Arc::new(client));
        base.trigger("/stop").await.unwrap();
    }

    #[tokio::test]
    async fn test_json_callback_drops_malformed_payloads() {
        use bridge_traits::CallbackRegistry;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut client = MockClient::new();
        client
            .expect_create_callback_context()
            .returning(|handler| CallbackRegistry::global().create_callback(handler));

        let base = CapabilityBase::new(CapabilityId::new("geo").unwrap(), Arc::new(client));
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        #[derive(serde::Deserialize)]
        struct Position {
            lat: f64,
        }

        let id = base.create_json_callback(move |position: Position| {
            assert!(position.lat > 0.0);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let registry = CallbackRegistry::global();
        assert!(registry.dispatch(id.as_str(), r#"{"lat": 59.33}"#));
        assert!(registry.dispatch(id.as_str(), "not json"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bridge_fn_is_bound_to_one_route() {
        let mut client = MockClient::new();
        client
            .expect_execute()
            .withf(|request| request.route().unwrap() == "/api/geo/subscribe")
            .times(2)
            .returning(|_| Ok(ok_response()));

        let base = CapabilityBase::new(CapabilityId::new("geo").unwrap(), Arc::new(client));
        let subscribe = base.bridge_fn("/subscribe");
        assert_eq!(subscribe.route().unwrap(), "/api/geo/subscribe");

        subscribe.call(&BridgeValue::from(1.0)).await.unwrap();
        subscribe.call(&BridgeValue::from(2.0)).await.unwrap();
    }
}
