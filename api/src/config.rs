//! Runtime configuration, layered from environment variables over the
//! compiled-in constants.

use std::env;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::Deserialize;
use serde::Serialize;

use crate::chain::to_hex_chain_id;
use crate::chain::AddEthereumChainParameter;
use crate::chain::NativeCurrency;
use crate::constants;

/// Describes the single network the exchange operates on.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_url: String,
    pub explorer_url: String,
}

impl NetworkConfig {
    pub fn sepolia() -> Self {
        Self {
            chain_id: constants::TARGET_CHAIN_ID,
            chain_name: constants::TARGET_CHAIN_NAME.to_string(),
            native_currency: NativeCurrency {
                name: constants::NATIVE_CURRENCY_NAME.to_string(),
                symbol: constants::NATIVE_CURRENCY_SYMBOL.to_string(),
                decimals: constants::NATIVE_CURRENCY_DECIMALS,
            },
            rpc_url: constants::TARGET_RPC_URL.to_string(),
            explorer_url: constants::TARGET_EXPLORER_URL.to_string(),
        }
    }

    /// The parameters proposed to a wallet that does not know this network.
    pub fn add_chain_parameter(&self) -> AddEthereumChainParameter {
        AddEthereumChainParameter {
            chain_id: to_hex_chain_id(self.chain_id),
            chain_name: self.chain_name.clone(),
            native_currency: self.native_currency.clone(),
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}

/// Everything the exchange needs to locate and talk to the contract.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub contract_address: Address,
    pub network: NetworkConfig,
    /// Decimal exponent of the quoted currency (USDC).
    pub quote_decimals: u8,
    pub token_decimals: u8,
    pub rate_decimals: u8,
    pub token_symbol: String,
    pub payment_symbol: String,
    /// JSON-RPC endpoint for native builds, which have no injected wallet.
    pub local_rpc_url: String,
}

impl ExchangeConfig {
    /// Creates a config from environment variables, falling back to the
    /// compiled-in constants for anything missing or unparseable.
    ///
    /// # Environment Variables
    /// - `FANR_CONTRACT_ADDRESS`: hex address of the token contract.
    /// - `FANR_CHAIN_ID`: target chain id, decimal or `0x` hex.
    /// - `FANR_RPC_URL`: JSON-RPC endpoint used by native builds.
    pub fn from_env() -> Self {
        let contract_address = env::var("FANR_CONTRACT_ADDRESS")
            .ok()
            .and_then(|s| Address::from_str(s.trim()).ok())
            .unwrap_or(constants::CONTRACT_ADDRESS);

        let mut network = NetworkConfig::sepolia();
        if let Some(chain_id) = env::var("FANR_CHAIN_ID")
            .ok()
            .and_then(|s| crate::chain::parse_chain_id(&s).ok())
        {
            network.chain_id = chain_id;
        }

        let local_rpc_url = env::var("FANR_RPC_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| constants::DEFAULT_LOCAL_RPC_URL.to_string());

        Self {
            contract_address,
            network,
            quote_decimals: constants::USDC_DECIMALS,
            token_decimals: constants::TOKEN_DECIMALS,
            rate_decimals: constants::RATE_DECIMALS,
            token_symbol: constants::TOKEN_SYMBOL.to_string(),
            payment_symbol: constants::PAYMENT_SYMBOL.to_string(),
            local_rpc_url,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
