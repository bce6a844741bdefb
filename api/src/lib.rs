//! This crate contains everything that talks to the chain: the wallet
//! transport, the exchange contract bindings and the shared configuration.

pub mod chain;
pub mod config;
pub mod constants;
pub mod contract;
pub mod eip1193;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
#[cfg(target_arch = "wasm32")]
pub mod injected;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod rates;
pub mod units;
pub mod wallet;

pub use alloy_primitives::address;
pub use alloy_primitives::Address;
pub use alloy_primitives::TxHash;
pub use alloy_primitives::U256;
