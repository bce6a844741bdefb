//! The browser-injected wallet (`window.ethereum`).

use std::str::FromStr;

use alloy_primitives::Address;
use js_sys::Function;
use js_sys::Object;
use js_sys::Promise;
use js_sys::Reflect;
use js_sys::JSON;
use serde_json::Value;
use tokio::sync::mpsc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::chain::parse_chain_id;
use crate::eip1193::Eip1193Provider;
use crate::eip1193::ProviderEvent;
use crate::eip1193::ProviderEvents;
use crate::eip1193::ProviderRpcError;
use crate::eip1193::TransportError;

const ACCOUNTS_CHANGED: &str = "accountsChanged";
const CHAIN_CHANGED: &str = "chainChanged";

pub struct InjectedProvider {
    ethereum: Object,
}

impl InjectedProvider {
    /// Returns the injected provider, or `None` when no wallet extension is installed.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self {
            ethereum: ethereum.unchecked_into(),
        })
    }

    fn function(&self, name: &str) -> Result<Function, TransportError> {
        Reflect::get(&self.ethereum, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| {
                TransportError::Transport(format!("window.ethereum.{name} is not a function"))
            })
    }

    fn listen(&self, register: &str, event: &str, handler: &JsValue) {
        let result = self
            .function(register)
            .and_then(|f| {
                f.call2(&self.ethereum, &JsValue::from_str(event), handler)
                    .map_err(js_error)
            });
        if let Err(e) = result {
            dioxus_logger::tracing::warn!("could not {register} {event} listener: {e}");
        }
    }
}

impl Eip1193Provider for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(js_error)?;
        Reflect::set(&args, &JsValue::from_str("params"), &to_js(&params)?).map_err(js_error)?;

        let promise: Promise = self
            .function("request")?
            .call1(&self.ethereum, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| TransportError::Transport("request did not return a promise".into()))?;

        let result = JsFuture::from(promise).await.map_err(js_error)?;
        from_js(&result)
    }

    fn subscribe(&self) -> ProviderEvents {
        let (tx, rx) = mpsc::unbounded_channel();

        let accounts_tx = tx.clone();
        let on_accounts = Closure::<dyn FnMut(JsValue)>::new(move |accounts: JsValue| {
            let accounts = from_js(&accounts)
                .ok()
                .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
                .unwrap_or_default()
                .iter()
                .filter_map(|s| Address::from_str(s).ok())
                .collect();
            let _ = accounts_tx.send(ProviderEvent::AccountsChanged(accounts));
        });
        let on_chain = Closure::<dyn FnMut(JsValue)>::new(move |chain: JsValue| {
            match chain.as_string().map(|s| parse_chain_id(&s)) {
                Some(Ok(id)) => {
                    let _ = tx.send(ProviderEvent::ChainChanged(id));
                }
                _ => dioxus_logger::tracing::warn!("ignoring malformed chainChanged: {chain:?}"),
            }
        });

        self.listen("on", ACCOUNTS_CHANGED, on_accounts.as_ref());
        self.listen("on", CHAIN_CHANGED, on_chain.as_ref());

        let provider = Self {
            ethereum: self.ethereum.clone(),
        };
        ProviderEvents::new(rx).with_cleanup(move || {
            provider.listen("removeListener", ACCOUNTS_CHANGED, on_accounts.as_ref());
            provider.listen("removeListener", CHAIN_CHANGED, on_chain.as_ref());
        })
    }
}

fn to_js(value: &Value) -> Result<JsValue, TransportError> {
    let text =
        serde_json::to_string(value).map_err(|e| TransportError::Transport(e.to_string()))?;
    JSON::parse(&text).map_err(js_error)
}

fn from_js(value: &JsValue) -> Result<Value, TransportError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let text: String = JSON::stringify(value).map_err(js_error)?.into();
    serde_json::from_str(&text).map_err(|e| TransportError::Transport(e.to_string()))
}

/// Maps a rejected promise or thrown value to a transport error, keeping the
/// EIP-1193 `code` when the wallet supplied one.
fn js_error(err: JsValue) -> TransportError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    match code {
        Some(code) => ProviderRpcError::new(code as i64, message).into(),
        None => TransportError::Transport(message),
    }
}
