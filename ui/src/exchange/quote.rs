/// Tokens bought for `usd_input` at `rate` USDC per token, fixed to six
/// fractional digits. USD and USDC are taken as 1:1.
///
/// Empty when the input is empty, zero or negative, or when the rate is not
/// positive.
pub fn compute_token_amount(usd_input: &str, rate: &str) -> String {
    let Some(usd) = parse_positive(usd_input) else {
        return String::new();
    };
    let Some(rate) = parse_positive(rate) else {
        return String::new();
    };

    let amount = usd / rate;
    if amount.is_finite() {
        format!("{amount:.6}")
    } else {
        String::new()
    }
}

/// Parses a user supplied decimal, keeping it only if strictly positive.
pub fn parse_positive(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divides_input_by_rate() {
        assert_eq!(compute_token_amount("50", "25"), "2.000000");
        assert_eq!(compute_token_amount("10", "3"), "3.333333");
        assert_eq!(compute_token_amount("1.5", "0.5"), "3.000000");
        assert_eq!(compute_token_amount(" 7 ", "10"), "0.700000");
    }

    #[test]
    fn always_six_fraction_digits() {
        for (usd, rate) in [("1", "7"), ("123.456", "0.001"), ("0.000001", "1000")] {
            let out = compute_token_amount(usd, rate);
            let (_, fraction) = out.split_once('.').unwrap();
            assert_eq!(fraction.len(), 6, "{usd}/{rate} gave {out}");
        }
    }

    #[test]
    fn empty_without_input() {
        assert_eq!(compute_token_amount("", "25"), "");
        assert_eq!(compute_token_amount("0", "25"), "");
        assert_eq!(compute_token_amount("0.0", "25"), "");
        assert_eq!(compute_token_amount("-5", "25"), "");
        assert_eq!(compute_token_amount("abc", "25"), "");
    }

    #[test]
    fn empty_without_rate() {
        assert_eq!(compute_token_amount("50", "0"), "");
        assert_eq!(compute_token_amount("50", "-1"), "");
        assert_eq!(compute_token_amount("50", ""), "");
    }
}
