//! Permission request state machine.
//!
//! One request round sends the permission set with `isJustified = false`.
//! If the host answers that any permission requires justification, the
//! optional justification flow runs locally: accepted, the whole set is
//! re-sent once with `isJustified = true` and the second result replaces
//! the first; declined (or no handler), the pending entries are denied in
//! place with no further round-trip. Transport and application errors
//! surface unchanged; nothing here retries.

use futures::future::BoxFuture;
use serde::Serialize;
use std::future::Future;
use tracing::warn;

use bridge_traits::{BridgeClient, BridgeError, BridgeRequest, ContentType, Result};

use crate::types::{PermissionGrantResult, PermissionId};

/// Capability id of the host permission broker.
pub const PERMISSIONS_CAPABILITY: &str = "permissions";

/// Method path of the request operation.
pub const REQUEST_METHOD: &str = "/request";

/// Decides whether the user accepted the justification flow.
pub type JustificationHandler = Box<dyn Fn() -> BoxFuture<'static, bool> + Send + Sync>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    permission_set: &'a [PermissionId],
    is_justified: bool,
}

/// A permission request for a non-empty set of permissions.
pub struct PermissionRequest {
    permissions: Vec<PermissionId>,
    justification: Option<JustificationHandler>,
}

impl std::fmt::Debug for PermissionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionRequest")
            .field("permissions", &self.permissions)
            .field("justification", &self.justification.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl PermissionRequest {
    /// Create a request. An empty permission set is protocol misuse and
    /// fails here, before any round-trip.
    pub fn new(permissions: Vec<PermissionId>) -> Result<Self> {
        if permissions.is_empty() {
            return Err(BridgeError::protocol(
                "permission request needs at least one permission",
            ));
        }
        Ok(Self {
            permissions,
            justification: None,
        })
    }

    /// Attach the justification flow.
    pub fn with_justification<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.justification = Some(Box::new(move || Box::pin(handler())));
        self
    }

    pub fn permissions(&self) -> &[PermissionId] {
        &self.permissions
    }

    /// Run the request flow against the host.
    pub async fn request(&self, client: &dyn BridgeClient) -> Result<PermissionGrantResult> {
        let mut result = self.round(client, false).await?;
        if !result.should_justify() {
            return Ok(result);
        }

        let accepted = match &self.justification {
            Some(handler) => handler().await,
            None => {
                warn!(
                    permissions = ?self.permissions,
                    "permissions require justification but no handler was supplied; declining"
                );
                false
            }
        };

        if accepted {
            self.round(client, true).await
        } else {
            result.reject_justifications();
            Ok(result)
        }
    }

    async fn round(
        &self,
        client: &dyn BridgeClient,
        is_justified: bool,
    ) -> Result<PermissionGrantResult> {
        let body = serde_json::to_vec(&RequestBody {
            permission_set: &self.permissions,
            is_justified,
        })
        .map_err(|e| BridgeError::protocol(format!("permission body encoding failed: {e}")))?;

        let request = BridgeRequest::new(PERMISSIONS_CAPABILITY, REQUEST_METHOD)
            .content_type(ContentType::Json)
            .body(body);

        let response = client.execute(request).await?;
        let wire: serde_json::Value = response.json()?;
        PermissionGrantResult::from_wire(&self.permissions, &wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PermissionState;
    use async_trait::async_trait;
    use bridge_traits::{
        callbacks::{CallbackHandler, CallbackId},
        BridgeResponse, Platform,
    };
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

    const X: PermissionId = PermissionId(4);
    const Y: PermissionId = PermissionId(9);

    fn body_json(request: &BridgeRequest) -> serde_json::Value {
        serde_json::from_slice(request.body.as_deref().expect("request body")).unwrap()
    }

    fn is_justified(request: &BridgeRequest) -> bool {
        body_json(request)["isJustified"].as_bool().unwrap()
    }

    fn grant_response(states: &[u8]) -> BridgeResponse {
        BridgeResponse::new(
            200,
            serde_json::to_vec(states).unwrap(),
            "Content-Type: application/json",
        )
    }

    #[test]
    fn test_empty_set_fails_fast() {
        let error = PermissionRequest::new(Vec::new()).unwrap_err();
        assert_eq!(error.domain(), bridge_traits::error::domains::PROTOCOL);
    }

    #[tokio::test]
    async fn test_all_terminal_returns_first_round() {
        let mut client = MockClient::new();
        client
            .expect_execute()
            .times(1)
            .returning(|_| Ok(grant_response(&[0, 2])));

        let request = PermissionRequest::new(vec![X, Y]).unwrap();
        let result = request.request(&client).await.unwrap();

        assert!(result.is_granted(X));
        assert_eq!(result.state(Y), Some(PermissionState::Denied));
    }

    #[tokio::test]
    async fn test_justification_accepted_returns_second_round() {
        let mut client = MockClient::new();
        let mut seq = mockall::Sequence::new();

        client
            .expect_execute()
            .withf(|request| {
                !is_justified(request)
                    && body_json(request)["permissionSet"] == serde_json::json!([4, 9])
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(grant_response(&[1, 0])));
        client
            .expect_execute()
            .withf(|request| is_justified(request))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(grant_response(&[0, 0])));

        let request = PermissionRequest::new(vec![X, Y])
            .unwrap()
            .with_justification(|| async { true });
        let result = request.request(&client).await.unwrap();

        assert!(result.is_all_granted());
    }

    #[tokio::test]
    async fn test_justification_declined_denies_locally() {
        let mut client = MockClient::new();
        client
            .expect_execute()
            .withf(|request| !is_justified(request))
            .times(1)
            .returning(|_| Ok(grant_response(&[1, 0])));

        let request = PermissionRequest::new(vec![X, Y])
            .unwrap()
            .with_justification(|| async { false });
        let result = request.request(&client).await.unwrap();

        assert_eq!(result.state(X), Some(PermissionState::Denied));
        assert_eq!(result.state(Y), Some(PermissionState::Granted));
        assert!(!result.is_all_granted());
    }

    #[tokio::test]
    async fn test_missing_handler_treated_as_declined() {
        let mut client = MockClient::new();
        client
            .expect_execute()
            .times(1)
            .returning(|_| Ok(grant_response(&[1])));

        let request = PermissionRequest::new(vec![X]).unwrap();
        let result = request.request(&client).await.unwrap();

        assert_eq!(result.state(X), Some(PermissionState::Denied));
    }

    #[tokio::test]
    async fn test_application_error_surfaces_undecorated() {
        let mut client = MockClient::new();
        client.expect_execute().times(1).returning(|_| {
            Err(BridgeError::new("Permissions", "broker unavailable").with_code(7))
        });

        let request = PermissionRequest::new(vec![X]).unwrap();
        let error = request.request(&client).await.unwrap_err();

        assert_eq!(error.domain(), "Permissions");
        assert_eq!(error.code(), 7);
    }
}
