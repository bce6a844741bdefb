//! Conversions between smallest-unit integers and human decimal strings.

use alloy_primitives::utils::format_units;
use alloy_primitives::utils::parse_units;
use alloy_primitives::utils::UnitsError;
use alloy_primitives::U256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmountError {
    #[error("invalid decimal amount: {0:?}")]
    InvalidFormat(String),
    #[error("amount must be positive")]
    NotPositive,
    #[error(transparent)]
    Units(#[from] UnitsError),
}

/// Formats a smallest-unit amount as a decimal string, dropping trailing
/// fractional zeros: `1500000000000000000` at 18 decimals is `"1.5"`.
pub fn format_token_amount(value: U256, decimals: u8) -> Result<String, AmountError> {
    let formatted = format_units(value, decimals)?;
    Ok(trim_fraction(formatted))
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    s
}

/// Converts a decimal amount into smallest units at `decimals`, truncating
/// any extra precision toward zero: `"12.3456789"` at 6 decimals is `12345678`.
///
/// Accepts what a numeric form field hands over, so a leading `+` and
/// exponent notation (`"1e3"`, `"2.5E-1"`) are expanded first.
pub fn to_smallest_unit(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();
    let invalid = || AmountError::InvalidFormat(amount.to_string());

    let expanded = expand_decimal(amount).ok_or_else(invalid)?;
    let (whole, fraction) = expanded.split_once('.').unwrap_or((&expanded, ""));

    let fraction = &fraction[..fraction.len().min(decimals as usize)];
    let truncated = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    let value: U256 = parse_units(&truncated, decimals)?.into();
    Ok(value)
}

/// Largest exponent magnitude [`to_smallest_unit`] will expand.
const MAX_EXPONENT: u32 = 96;

/// Rewrites an unsigned decimal, optionally in exponent notation, as plain
/// `whole[.fraction]` digits with no leading zeros in the whole part.
fn expand_decimal(amount: &str) -> Option<String> {
    let amount = amount.strip_prefix('+').unwrap_or(amount);
    let (mantissa, exponent) = match amount.split_once(|c: char| c == 'e' || c == 'E') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().ok()?),
        None => (amount, 0),
    };
    if exponent.unsigned_abs() > MAX_EXPONENT {
        return None;
    }

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let digits = format!("{whole}{fraction}");
    let point = whole.len() as i64 + i64::from(exponent);
    let (whole, fraction) = if point <= 0 {
        let zeros = "0".repeat(point.unsigned_abs() as usize);
        (String::new(), format!("{zeros}{digits}"))
    } else if point as usize >= digits.len() {
        let zeros = "0".repeat(point as usize - digits.len());
        (format!("{digits}{zeros}"), String::new())
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        (whole.to_string(), fraction.to_string())
    };

    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    if fraction.is_empty() {
        Some(whole.to_string())
    } else {
        Some(format!("{whole}.{fraction}"))
    }
}
