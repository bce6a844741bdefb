// ui/src/currency.rs

/// Formats a decimal balance for display: thousands separators and at most
/// three fractional digits, rounded. Anything unparseable shows as `"0"`.
pub fn format_balance(balance: &str) -> String {
    let Ok(value) = balance.trim().parse::<f64>() else {
        return "0".to_string();
    };
    if !value.is_finite() {
        return "0".to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_rounds() {
        assert_eq!(format_balance("0"), "0");
        assert_eq!(format_balance("1.5"), "1.5");
        assert_eq!(format_balance("1234"), "1,234");
        assert_eq!(format_balance("1234567.891234"), "1,234,567.891");
        assert_eq!(format_balance("999.9996"), "1,000");
        assert_eq!(format_balance("0.000000000000000017"), "0");
        assert_eq!(format_balance("100"), "100");
    }

    #[test]
    fn garbage_shows_zero() {
        assert_eq!(format_balance(""), "0");
        assert_eq!(format_balance("n/a"), "0");
    }
}
