//! Request parameters for the EIP-3326 / EIP-3085 wallet methods and chain id parsing.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid chain id: {0:?}")]
pub struct ParseChainIdError(pub String);

/// Parses a chain id as wallets report it: `0x`-prefixed hex, or plain decimal.
pub fn parse_chain_id(s: &str) -> Result<u64, ParseChainIdError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|_| ParseChainIdError(s.to_string()))
}

/// Formats a chain id the way `wallet_*` methods expect it.
pub fn to_hex_chain_id(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}

/// Parameter of `wallet_switchEthereumChain`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchEthereumChainParameter {
    pub chain_id: String,
}

impl SwitchEthereumChainParameter {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: to_hex_chain_id(chain_id),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameter of `wallet_addEthereumChain`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_decimal_chain_ids() {
        assert_eq!(parse_chain_id("0xaa36a7"), Ok(11_155_111));
        assert_eq!(parse_chain_id("0x1"), Ok(1));
        assert_eq!(parse_chain_id("11155111"), Ok(11_155_111));
        assert!(parse_chain_id("sepolia").is_err());
        assert!(parse_chain_id("0x").is_err());
    }

    #[test]
    fn hex_chain_id_matches_wallet_format() {
        assert_eq!(to_hex_chain_id(11_155_111), "0xaa36a7");
        assert_eq!(SwitchEthereumChainParameter::new(1).chain_id, "0x1");
    }

    #[test]
    fn add_chain_parameter_uses_camel_case_names() {
        let params = AddEthereumChainParameter {
            chain_id: "0xaa36a7".to_string(),
            chain_name: "Sepolia Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "Sepolia ETH".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://sepolia.infura.io/v3/".to_string()],
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["chainId"], "0xaa36a7");
        assert_eq!(json["chainName"], "Sepolia Testnet");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["rpcUrls"][0], "https://sepolia.infura.io/v3/");
        assert_eq!(json["blockExplorerUrls"][0], "https://sepolia.etherscan.io");
    }
}
