//! FanRating token contract bindings.

use alloy_primitives::Address;
use alloy_primitives::TxHash;
use alloy_primitives::U256;
use alloy_sol_types::sol;
use alloy_sol_types::SolCall;
use thiserror::Error;

use crate::eip1193::Eip1193Provider;
use crate::wallet::Wallet;
use crate::wallet::WalletError;

sol! {
    /// The subset of the deployed token contract the exchange uses.
    interface IFanRatingToken {
        /// Token balance of an account, in 18-decimal smallest units.
        function balanceOf(address account) external view returns (uint256);

        /// Supported payment tokens and their rates, in 18-decimal smallest units.
        function getSupportedTokensAndRates()
            external
            view
            returns (string[] memory symbols, uint256[] memory rates);

        /// Records a simulated exchange for `user`.
        function recordExchange(address user, string symbol, uint256 amount, bool isBuying) external;
    }
}

#[derive(Error, Debug)]
pub enum ContractError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("abi decoding failed: {0}")]
    Abi(#[from] alloy_sol_types::Error),
}

/// The three contract operations the exchange relies on, independent of the
/// client used to reach the chain.
#[allow(async_fn_in_trait)]
pub trait ExchangeContract {
    async fn balance_of(&self, account: Address) -> Result<U256, ContractError>;

    /// Returns `(symbols, rates)` with rates in smallest units.
    async fn supported_tokens_and_rates(&self) -> Result<(Vec<String>, Vec<U256>), ContractError>;

    /// Submits `recordExchange`, signed by `account`.
    async fn record_exchange(
        &self,
        account: Address,
        symbol: &str,
        amount: U256,
        is_buying: bool,
    ) -> Result<TxHash, ContractError>;
}

/// [`ExchangeContract`] over a wallet provider, ABI-encoding each call.
#[derive(Debug)]
pub struct FanRatingContract<P> {
    wallet: Wallet<P>,
    address: Address,
}

impl<P> Clone for FanRatingContract<P> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            address: self.address,
        }
    }
}

impl<P: Eip1193Provider> FanRatingContract<P> {
    pub fn new(wallet: Wallet<P>, address: Address) -> Self {
        Self { wallet, address }
    }
}

impl<P: Eip1193Provider> ExchangeContract for FanRatingContract<P> {
    async fn balance_of(&self, account: Address) -> Result<U256, ContractError> {
        let call = IFanRatingToken::balanceOfCall { account };
        let output = self.wallet.call(self.address, call.abi_encode().into()).await?;
        Ok(IFanRatingToken::balanceOfCall::abi_decode_returns(&output)?)
    }

    async fn supported_tokens_and_rates(&self) -> Result<(Vec<String>, Vec<U256>), ContractError> {
        let call = IFanRatingToken::getSupportedTokensAndRatesCall {};
        let output = self.wallet.call(self.address, call.abi_encode().into()).await?;
        let decoded = IFanRatingToken::getSupportedTokensAndRatesCall::abi_decode_returns(&output)?;
        Ok((decoded.symbols, decoded.rates))
    }

    async fn record_exchange(
        &self,
        account: Address,
        symbol: &str,
        amount: U256,
        is_buying: bool,
    ) -> Result<TxHash, ContractError> {
        let call = IFanRatingToken::recordExchangeCall {
            user: account,
            symbol: symbol.to_string(),
            amount,
            isBuying: is_buying,
        };
        let hash = self
            .wallet
            .send_transaction(account, self.address, call.abi_encode().into())
            .await?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use alloy_primitives::address;
    use alloy_primitives::Bytes;
    use alloy_sol_types::SolValue;
    use serde_json::json;

    const CONTRACT: Address = address!("911F1aD85bf9120379f2D043eebEb5AC8d80Edd3");
    const ALICE: Address = address!("00000000000000000000000000000000000a11ce");

    fn contract(provider: &MockProvider) -> FanRatingContract<MockProvider> {
        FanRatingContract::new(Wallet::new(provider.clone()), CONTRACT)
    }

    #[tokio::test]
    async fn balance_of_encodes_account_and_decodes_uint() {
        let provider = MockProvider::new();
        let encoded = Bytes::from(U256::from(42u64).abi_encode());
        provider.respond("eth_call", json!(encoded));

        let balance = contract(&provider).balance_of(ALICE).await.unwrap();
        assert_eq!(balance, U256::from(42u64));

        let request = &provider.requests_for("eth_call")[0];
        let expected = Bytes::from(IFanRatingToken::balanceOfCall { account: ALICE }.abi_encode());
        assert_eq!(request.params[0]["to"], json!(CONTRACT));
        assert_eq!(request.params[0]["data"], json!(expected));
        assert_eq!(request.params[1], "latest");
    }

    #[tokio::test]
    async fn rates_decode_both_arrays() {
        let provider = MockProvider::new();
        let symbols = vec!["FANR".to_string()];
        let rates = vec![U256::from(10u64)];
        let encoded = Bytes::from((symbols.clone(), rates.clone()).abi_encode_params());
        provider.respond("eth_call", json!(encoded));

        let (got_symbols, got_rates) = contract(&provider).supported_tokens_and_rates().await.unwrap();
        assert_eq!(got_symbols, symbols);
        assert_eq!(got_rates, rates);
    }

    #[tokio::test]
    async fn record_exchange_is_sent_from_the_account() {
        let provider = MockProvider::new();
        let hash = TxHash::repeat_byte(7);
        provider.respond("eth_sendTransaction", json!(hash));

        let got = contract(&provider)
            .record_exchange(ALICE, "USDC", U256::from(50_000_000u64), true)
            .await
            .unwrap();
        assert_eq!(got, hash);

        let request = &provider.requests_for("eth_sendTransaction")[0];
        assert_eq!(request.params[0]["from"], json!(ALICE));
        assert_eq!(request.params[0]["to"], json!(CONTRACT));
        let data: Bytes = serde_json::from_value(request.params[0]["data"].clone()).unwrap();
        let decoded = IFanRatingToken::recordExchangeCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.user, ALICE);
        assert_eq!(decoded.symbol, "USDC");
        assert_eq!(decoded.amount, U256::from(50_000_000u64));
        assert!(decoded.isBuying);
    }

    #[tokio::test]
    async fn garbage_output_is_an_abi_error() {
        let provider = MockProvider::new();
        provider.respond("eth_call", json!("0x01"));

        let err = contract(&provider).balance_of(ALICE).await.unwrap_err();
        assert!(matches!(err, ContractError::Abi(_)));
    }
}
