//! A scripted in-memory provider for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::eip1193::Eip1193Provider;
use crate::eip1193::ProviderEvent;
use crate::eip1193::ProviderEvents;
use crate::eip1193::ProviderRpcError;
use crate::eip1193::TransportError;

/// A request as the provider received it.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub params: Value,
}

#[derive(Default)]
struct Inner {
    responses: HashMap<String, Result<Value, TransportError>>,
    requests: Vec<RecordedRequest>,
    listeners: Vec<(u64, mpsc::UnboundedSender<ProviderEvent>)>,
    next_listener: u64,
}

/// Answers requests from a script and records them.
///
/// Methods without a scripted answer fail with `UNSUPPORTED_METHOD`. Clones
/// share the script, so a test can keep one clone for inspection while the
/// code under test owns another.
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Rc<RefCell<Inner>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every future `method` request with `value`.
    pub fn respond(&self, method: &str, value: Value) {
        self.inner
            .borrow_mut()
            .responses
            .insert(method.to_string(), Ok(value));
    }

    /// Fails every future `method` request with `error`.
    pub fn fail(&self, method: &str, error: ProviderRpcError) {
        self.inner
            .borrow_mut()
            .responses
            .insert(method.to_string(), Err(error.into()));
    }

    /// Fails every future `method` request without an answer from the wallet.
    pub fn fail_transport(&self, method: &str, reason: &str) {
        self.inner.borrow_mut().responses.insert(
            method.to_string(),
            Err(TransportError::Transport(reason.to_string())),
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.borrow().requests.clone()
    }

    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.inner
            .borrow()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    /// Pushes a notification to every live subscription.
    pub fn emit(&self, event: ProviderEvent) {
        let inner = self.inner.borrow();
        for (_, tx) in &inner.listeners {
            let _ = tx.send(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl Eip1193Provider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let mut inner = self.inner.borrow_mut();
        inner.requests.push(RecordedRequest {
            method: method.to_string(),
            params,
        });
        match inner.responses.get(method) {
            Some(result) => result.clone(),
            None => Err(ProviderRpcError::new(
                ProviderRpcError::UNSUPPORTED_METHOD,
                format!("{method} is not scripted"),
            )
            .into()),
        }
    }

    fn subscribe(&self) -> ProviderEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push((id, tx));
            id
        };
        let inner = self.inner.clone();
        ProviderEvents::new(rx).with_cleanup(move || {
            inner.borrow_mut().listeners.retain(|(l, _)| *l != id);
        })
    }
}
