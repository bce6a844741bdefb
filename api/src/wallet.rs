//! Typed wallet operations over an [`Eip1193Provider`].

use std::rc::Rc;
use std::str::FromStr;

use alloy_primitives::Address;
use alloy_primitives::Bytes;
use alloy_primitives::TxHash;
use serde_json::json;
use serde_json::Value;
use thiserror::Error;

use crate::chain::parse_chain_id;
use crate::chain::AddEthereumChainParameter;
use crate::chain::SwitchEthereumChainParameter;
use crate::eip1193::Eip1193Provider;
use crate::eip1193::ProviderEvents;
use crate::eip1193::ProviderRpcError;
use crate::eip1193::TransportError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The provider answered, but not with what the method promises.
    #[error("invalid response to {method}: {reason}")]
    InvalidResponse { method: &'static str, reason: String },
}

impl WalletError {
    /// The EIP-1193 error code, if the provider returned one.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Transport(e) => e.rpc_code(),
            Self::InvalidResponse { .. } => None,
        }
    }

    /// The user declined the request in the wallet.
    pub fn is_user_rejected(&self) -> bool {
        self.rpc_code() == Some(ProviderRpcError::USER_REJECTED)
    }

    /// The wallet does not know the requested chain and it must be added first.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.rpc_code() == Some(ProviderRpcError::UNRECOGNIZED_CHAIN)
    }

    fn invalid(method: &'static str, reason: impl ToString) -> Self {
        Self::InvalidResponse {
            method,
            reason: reason.to_string(),
        }
    }
}

/// A shared handle to a wallet provider.
///
/// Cloning is cheap; all clones talk to the same provider.
#[derive(Debug)]
pub struct Wallet<P> {
    provider: Rc<P>,
}

impl<P> Clone for Wallet<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<P: Eip1193Provider> Wallet<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Rc::new(provider),
        }
    }

    /// Accounts already authorized for this site. Never prompts the user.
    pub async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        let value = self.provider.request("eth_accounts", json!([])).await?;
        parse_accounts("eth_accounts", value)
    }

    /// Asks the user to authorize account access.
    pub async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let value = self
            .provider
            .request("eth_requestAccounts", json!([]))
            .await?;
        parse_accounts("eth_requestAccounts", value)
    }

    pub async fn chain_id(&self) -> Result<u64, WalletError> {
        let value = self.provider.request("eth_chainId", json!([])).await?;
        match &value {
            Value::String(s) => parse_chain_id(s).map_err(|e| WalletError::invalid("eth_chainId", e)),
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| WalletError::invalid("eth_chainId", n)),
            other => Err(WalletError::invalid("eth_chainId", other)),
        }
    }

    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let params = json!([SwitchEthereumChainParameter::new(chain_id)]);
        self.provider
            .request("wallet_switchEthereumChain", params)
            .await?;
        Ok(())
    }

    pub async fn add_chain(&self, params: &AddEthereumChainParameter) -> Result<(), WalletError> {
        self.provider
            .request("wallet_addEthereumChain", json!([params]))
            .await?;
        Ok(())
    }

    /// Executes a read-only call against the latest block.
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError> {
        let value = self
            .provider
            .request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await?;
        serde_json::from_value(value).map_err(|e| WalletError::invalid("eth_call", e))
    }

    /// Submits a transaction signed by `from`. The returned hash is the
    /// wallet's acknowledgment; it does not mean the transaction is mined.
    pub async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<TxHash, WalletError> {
        let value = self
            .provider
            .request(
                "eth_sendTransaction",
                json!([{ "from": from, "to": to, "data": data }]),
            )
            .await?;
        serde_json::from_value(value).map_err(|e| WalletError::invalid("eth_sendTransaction", e))
    }

    pub fn subscribe(&self) -> ProviderEvents {
        self.provider.subscribe()
    }
}

fn parse_accounts(method: &'static str, value: Value) -> Result<Vec<Address>, WalletError> {
    let raw: Vec<String> =
        serde_json::from_value(value).map_err(|e| WalletError::invalid(method, e))?;
    raw.iter()
        .map(|s| Address::from_str(s).map_err(|e| WalletError::invalid(method, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use alloy_primitives::address;

    const ALICE: Address = address!("00000000000000000000000000000000000a11ce");

    #[tokio::test]
    async fn accounts_are_parsed_from_hex_strings() {
        let provider = MockProvider::new();
        provider.respond("eth_accounts", json!([ALICE.to_string()]));
        let wallet = Wallet::new(provider.clone());

        assert_eq!(wallet.accounts().await.unwrap(), vec![ALICE]);
        assert_eq!(provider.requests()[0].method, "eth_accounts");
    }

    #[tokio::test]
    async fn malformed_accounts_are_rejected() {
        let provider = MockProvider::new();
        provider.respond("eth_requestAccounts", json!(["not-an-address"]));
        let wallet = Wallet::new(provider);

        let err = wallet.request_accounts().await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidResponse { method: "eth_requestAccounts", .. }));
    }

    #[tokio::test]
    async fn chain_id_accepts_hex_and_numbers() {
        let provider = MockProvider::new();
        let wallet = Wallet::new(provider.clone());

        provider.respond("eth_chainId", json!("0xaa36a7"));
        assert_eq!(wallet.chain_id().await.unwrap(), 11_155_111);

        provider.respond("eth_chainId", json!(1));
        assert_eq!(wallet.chain_id().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn switch_chain_sends_hex_id() {
        let provider = MockProvider::new();
        provider.respond("wallet_switchEthereumChain", Value::Null);
        let wallet = Wallet::new(provider.clone());

        wallet.switch_chain(11_155_111).await.unwrap();
        let requests = provider.requests();
        assert_eq!(requests[0].params, json!([{ "chainId": "0xaa36a7" }]));
    }

    #[tokio::test]
    async fn rpc_errors_keep_their_code() {
        let provider = MockProvider::new();
        provider.fail(
            "wallet_switchEthereumChain",
            ProviderRpcError::new(ProviderRpcError::UNRECOGNIZED_CHAIN, "Unrecognized chain ID"),
        );
        let wallet = Wallet::new(provider);

        let err = wallet.switch_chain(11_155_111).await.unwrap_err();
        assert_eq!(err.rpc_code(), Some(4902));
        assert!(err.is_unrecognized_chain());
        assert!(!err.is_user_rejected());
    }

    #[tokio::test]
    async fn send_transaction_returns_hash() {
        let provider = MockProvider::new();
        let hash = TxHash::repeat_byte(0xab);
        provider.respond("eth_sendTransaction", json!(hash));
        let wallet = Wallet::new(provider.clone());

        let got = wallet
            .send_transaction(ALICE, Address::ZERO, Bytes::from(vec![1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(got, hash);
        let params = &provider.requests()[0].params;
        assert_eq!(params[0]["data"], "0x010203");
    }
}
