//! HTTP Bridge Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    callbacks::{CallbackHandler, CallbackId, CallbackRegistry},
    client::{BridgeClient, BridgeRequest},
    error::{BridgeError, Result},
    platform::Platform,
    response::BridgeResponse,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::channel::{HostChannel, AUTH_HEADER};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reqwest-based bridge transport.
///
/// One POST per `execute` call, no retries. Endpoint and secret come from
/// the channel fresh on every call; neither is cached here, and the secret
/// never reaches a log entry.
pub struct HttpBridgeClient {
    channel: HostChannel,
    http: Client,
    registry: &'static CallbackRegistry,
}

impl HttpBridgeClient {
    /// Create a client with the default request timeout.
    pub fn new(channel: HostChannel) -> Self {
        Self::with_timeout(channel, DEFAULT_TIMEOUT)
    }

    /// Create a client with a deployment-specific timeout.
    pub fn with_timeout(channel: HostChannel, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("hostbridge/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            channel,
            http,
            registry: CallbackRegistry::global(),
        }
    }

    /// Create a client around a preconfigured reqwest client.
    pub fn with_client(channel: HostChannel, http: Client) -> Self {
        Self {
            channel,
            http,
            registry: CallbackRegistry::global(),
        }
    }

    pub fn channel(&self) -> &HostChannel {
        &self.channel
    }
}

/// Map a reqwest failure to a transport-domain error, keeping "could not
/// talk to the host" distinguishable from anything the host itself said.
fn transport_error(error: reqwest::Error) -> BridgeError {
    if error.is_timeout() {
        BridgeError::transport("request timed out")
    } else if error.is_connect() {
        BridgeError::transport(format!("connection to host failed: {error}"))
    } else {
        BridgeError::transport(error.to_string())
    }
}

/// Rebuild the newline-delimited `key: value` header block, preserving
/// duplicate keys in arrival order.
fn flatten_headers(headers: &reqwest::header::HeaderMap) -> String {
    let mut block = String::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(value);
        block.push('\n');
    }
    block
}

#[async_trait]
impl BridgeClient for HttpBridgeClient {
    fn platform(&self) -> Platform {
        self.channel.platform()
    }

    async fn execute(&self, request: BridgeRequest) -> Result<BridgeResponse> {
        let route = request.route()?;
        let endpoint = self.channel.resolve_endpoint()?;
        let secret = self.channel.auth_secret()?;

        let content_type = request.content_type.unwrap_or_default();
        debug!(
            platform = %self.platform(),
            route = %route,
            content_type = %content_type,
            body_len = request.body.as_ref().map(|b| b.len()),
            "executing bridge request"
        );

        let mut builder = self
            .http
            .post(format!("{endpoint}{route}"))
            .header(CONTENT_TYPE, content_type.mime())
            .header(AUTH_HEADER, secret.expose());

        // A bare trigger sends no body at all rather than an empty one.
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let raw_headers = flatten_headers(response.headers());
        let body = response.bytes().await.map_err(transport_error)?;

        if status >= 400 {
            let error = match BridgeError::decode(&body) {
                Ok(decoded) => decoded,
                Err(undecodable) => undecodable.with_code(i64::from(status)),
            };
            warn!(
                status,
                route = %route,
                domain = error.domain(),
                "host returned application error"
            );
            return Err(error);
        }

        Ok(BridgeResponse::new(status, body, raw_headers))
    }

    fn create_callback_context(&self, handler: CallbackHandler) -> CallbackId {
        self.registry.create_callback(handler)
    }

    fn release_callback(&self, id: &CallbackId) {
        self.registry.release_callback(id);
    }
}
