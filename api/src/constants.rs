//! Fixed deployment parameters for the FanRating exchange.

use alloy_primitives::address;
use alloy_primitives::Address;

/// The deployed FanRating token contract on the target network.
pub const CONTRACT_ADDRESS: Address = address!("911F1aD85bf9120379f2D043eebEb5AC8d80Edd3");

/// Sepolia testnet.
pub const TARGET_CHAIN_ID: u64 = 11_155_111;
pub const TARGET_CHAIN_NAME: &str = "Sepolia Testnet";

pub const NATIVE_CURRENCY_NAME: &str = "Sepolia ETH";
pub const NATIVE_CURRENCY_SYMBOL: &str = "ETH";
pub const NATIVE_CURRENCY_DECIMALS: u8 = 18;

/// Only used when proposing the network to a wallet that does not know it.
pub const TARGET_RPC_URL: &str = "https://sepolia.infura.io/v3/";
pub const TARGET_EXPLORER_URL: &str = "https://sepolia.etherscan.io";

/// USDC has 6 decimals (not 18 like most ERC20 tokens).
pub const USDC_DECIMALS: u8 = 6;

/// Decimals of the FanRating token balance.
pub const TOKEN_DECIMALS: u8 = 18;

/// Scale of the rates returned by `getSupportedTokensAndRates`.
pub const RATE_DECIMALS: u8 = 18;

/// Symbol whose entry in the rates table is the FANR price in USDC.
pub const TOKEN_SYMBOL: &str = "FANR";

/// Currency recorded as paid in by `recordExchange`.
pub const PAYMENT_SYMBOL: &str = "USDC";

/// Endpoint used by the native JSON-RPC provider when none is configured.
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
