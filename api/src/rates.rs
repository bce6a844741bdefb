//! The table of supported tokens and their exchange rates.

use alloy_primitives::U256;
use serde::Deserialize;
use serde::Serialize;

use crate::units::format_token_amount;
use crate::units::AmountError;

/// Token symbols paired index-wise with human-readable decimal rates.
///
/// The table is always replaced wholesale by a fresh read, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRatesTable {
    pub tokens: Vec<String>,
    pub rates: Vec<String>,
}

impl ExchangeRatesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from raw contract output, scaling each rate down by
    /// `rate_decimals`.
    pub fn from_raw(
        tokens: Vec<String>,
        raw_rates: &[U256],
        rate_decimals: u8,
    ) -> Result<Self, AmountError> {
        let rates = raw_rates
            .iter()
            .map(|rate| format_token_amount(*rate, rate_decimals))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens, rates })
    }

    /// The rate listed for `symbol`, or `"0"` when the symbol is absent.
    pub fn rate_for(&self, symbol: &str) -> &str {
        self.tokens
            .iter()
            .position(|t| t == symbol)
            .and_then(|i| self.rates.get(i))
            .map(String::as_str)
            .unwrap_or("0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(tokens: &[&str], rates: &[&str]) -> ExchangeRatesTable {
        ExchangeRatesTable {
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
            rates: rates.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn finds_listed_rate() {
        let rates = table(&["FANR"], &["10"]);
        assert_eq!(rates.rate_for("FANR"), "10");
    }

    #[test]
    fn missing_symbol_reads_as_zero() {
        let rates = table(&["DAI", "USDT"], &["1", "1"]);
        assert_eq!(rates.rate_for("FANR"), "0");
        assert_eq!(ExchangeRatesTable::new().rate_for("FANR"), "0");
    }

    #[test]
    fn symbol_without_rate_reads_as_zero() {
        let rates = table(&["USDT", "FANR"], &["1"]);
        assert_eq!(rates.rate_for("FANR"), "0");
    }

    #[test]
    fn raw_rates_are_scaled_to_decimals() {
        let raw = [
            U256::from(10_000_000_000_000_000_000u128),
            U256::from(250_000_000_000_000_000u128),
        ];
        let rates =
            ExchangeRatesTable::from_raw(vec!["FANR".into(), "DAI".into()], &raw, 18).unwrap();
        assert_eq!(rates.rates, vec!["10", "0.25"]);
        assert_eq!(rates.rate_for("DAI"), "0.25");
    }
}
