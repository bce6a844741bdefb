//! A JSON-RPC over HTTP provider for native builds.
//!
//! Native builds have no browser-injected wallet. This provider talks to a
//! node that manages its own unlocked accounts (a local development node),
//! so account authorization is implicit and the `wallet_*` methods are not
//! available.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dioxus_logger::tracing::debug;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use crate::eip1193::Eip1193Provider;
use crate::eip1193::ProviderEvents;
use crate::eip1193::ProviderRpcError;
use crate::eip1193::TransportError;

#[derive(Deserialize, Debug)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ProviderRpcError>,
}

pub struct HttpProvider {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Eip1193Provider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let method = match method {
            // a node has no permission prompt; its accounts are always exposed.
            "eth_requestAccounts" => "eth_accounts",
            m if m.starts_with("wallet_") => {
                return Err(ProviderRpcError::new(
                    ProviderRpcError::UNSUPPORTED_METHOD,
                    format!("{m} is not supported by a JSON-RPC node"),
                )
                .into());
            }
            m => m,
        };

        debug!("{} <- {method}", self.url);
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?
            .json::<JsonRpcResponse>()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        match (resp.result, resp.error) {
            (_, Some(error)) => Err(error.into()),
            (Some(result), None) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }

    fn subscribe(&self) -> ProviderEvents {
        ProviderEvents::empty()
    }
}
