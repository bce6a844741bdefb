//! The wallet transport seam: an EIP-1193 style provider.
//!
//! A provider answers JSON-RPC style `request`s and pushes
//! `accountsChanged` / `chainChanged` notifications. Everything above it
//! (typed wallet calls, contract bindings) is written against this trait so
//! the browser-injected wallet, a plain JSON-RPC node and the test double are
//! interchangeable.

use std::fmt;

use alloy_primitives::Address;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// An error object returned by the provider, as defined by EIP-1193.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

impl ProviderRpcError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The provider does not support the requested method.
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The wallet does not recognize the requested chain (EIP-3326).
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Notifications pushed by the provider.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum ProviderEvent {
    /// The set of exposed accounts changed. Empty means the wallet locked or
    /// revoked access.
    AccountsChanged(Vec<Address>),
    /// The active chain changed.
    ChainChanged(u64),
}

/// A subscription to provider notifications.
///
/// Dropping it unregisters the underlying listeners.
pub struct ProviderEvents {
    rx: mpsc::UnboundedReceiver<ProviderEvent>,
    on_drop: Option<Box<dyn FnOnce()>>,
}

impl ProviderEvents {
    pub fn new(rx: mpsc::UnboundedReceiver<ProviderEvent>) -> Self {
        Self { rx, on_drop: None }
    }

    /// Runs `cleanup` when the subscription is dropped.
    pub fn with_cleanup(mut self, cleanup: impl FnOnce() + 'static) -> Self {
        self.on_drop = Some(Box::new(cleanup));
        self
    }

    /// An already closed subscription, for providers without notifications.
    pub fn empty() -> Self {
        let (_tx, rx) = mpsc::unbounded_channel();
        Self::new(rx)
    }

    /// Waits for the next notification. `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<ProviderEvent> {
        self.rx.recv().await
    }
}

impl fmt::Debug for ProviderEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEvents").finish_non_exhaustive()
    }
}

impl Drop for ProviderEvents {
    fn drop(&mut self) {
        if let Some(cleanup) = self.on_drop.take() {
            cleanup();
        }
    }
}

/// A trait for any transport that can serve wallet requests.
#[allow(async_fn_in_trait)]
pub trait Eip1193Provider {
    /// Sends a request and returns the raw JSON result.
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError>;

    /// Registers for `accountsChanged` and `chainChanged` notifications.
    fn subscribe(&self) -> ProviderEvents;
}

/// A failure to complete a provider request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The provider answered with an error object.
    #[error(transparent)]
    Rpc(#[from] ProviderRpcError),
    /// The request never got an answer (network, js exception, ...).
    #[error("transport failure: {0}")]
    Transport(String),
}

impl TransportError {
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc(e) => Some(e.code),
            Self::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn error_codes() {
        let e = ProviderRpcError::new(4902, "Unrecognized chain ID");
        assert_eq!(TransportError::from(e).rpc_code(), Some(4902));
        assert_eq!(TransportError::Transport("down".into()).rpc_code(), None);
    }

    #[test]
    fn dropping_subscription_runs_cleanup() {
        let cleaned = Rc::new(Cell::new(false));
        let flag = cleaned.clone();
        let (_tx, rx) = mpsc::unbounded_channel();
        let events = ProviderEvents::new(rx).with_cleanup(move || flag.set(true));
        assert!(!cleaned.get());
        drop(events);
        assert!(cleaned.get());
    }

    #[tokio::test]
    async fn subscription_yields_events_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut events = ProviderEvents::new(rx);
        tx.send(ProviderEvent::ChainChanged(1)).unwrap();
        tx.send(ProviderEvent::AccountsChanged(vec![])).unwrap();
        drop(tx);
        assert_eq!(events.next().await, Some(ProviderEvent::ChainChanged(1)));
        assert!(events.next().await.unwrap().is_accounts_changed());
        assert_eq!(events.next().await, None);
    }
}
