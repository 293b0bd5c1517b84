//! Exact decimal money arithmetic.
//!
//! Spend and winnings are tracked at fixed two-decimal precision. All
//! arithmetic goes through [`rust_decimal::Decimal`]; floating point is never
//! used, so sums over many small amounts cannot drift. Rounding happens only
//! at the formatting boundary.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for parsing monetary amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount is not a valid decimal number")]
    NotANumber,

    #[error("Amount must be non-negative")]
    Negative,

    #[error("Amount has more than two decimal places")]
    TooPrecise,
}

/// Parses a monetary amount from its string form.
///
/// Accepts non-negative decimals with at most two fractional digits,
/// e.g. `"0"`, `"12.5"`, `"100.00"`.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let value: Decimal = input.trim().parse().map_err(|_| MoneyError::NotANumber)?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(MoneyError::Negative);
    }

    // round_dp truncates nothing when the value already fits in 2dp
    if value.round_dp(2) != value {
        return Err(MoneyError::TooPrecise);
    }

    Ok(value.normalize())
}

/// Formats an amount with exactly two decimal places, e.g. `"12.50"`.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Formats an amount with an explicit sign: `"+50.00"`, `"-30.00"`, `"0.00"`.
pub fn format_signed(value: Decimal) -> String {
    if value.is_zero() {
        "0.00".to_string()
    } else if value.is_sign_negative() {
        format!("-{:.2}", value.abs())
    } else {
        format!("+{:.2}", value)
    }
}

/// Sums a sequence of amounts exactly.
pub fn sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v)
}

/// Net result of one participant: winnings minus spend.
pub fn net(won: Decimal, spent: Decimal) -> Decimal {
    won - spent
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_valid_amounts() {
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("100.00").unwrap(), d("100"));
        assert_eq!(parse_amount("12.5").unwrap(), d("12.5"));
        assert_eq!(parse_amount(" 7.25 ").unwrap(), d("7.25"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_amount("abc"), Err(MoneyError::NotANumber));
        assert_eq!(parse_amount(""), Err(MoneyError::NotANumber));
        assert_eq!(parse_amount("1.2.3"), Err(MoneyError::NotANumber));
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(parse_amount("-1"), Err(MoneyError::Negative));
        assert_eq!(parse_amount("-0.01"), Err(MoneyError::Negative));
    }

    #[test]
    fn test_parse_negative_zero_is_zero() {
        assert_eq!(parse_amount("-0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("-0.00").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_rejects_sub_cent_precision() {
        assert_eq!(parse_amount("1.005"), Err(MoneyError::TooPrecise));
        assert_eq!(parse_amount("0.001"), Err(MoneyError::TooPrecise));
    }

    #[test]
    fn test_format_amount_fixed_two_places() {
        assert_eq!(format_amount(d("50")), "50.00");
        assert_eq!(format_amount(d("12.5")), "12.50");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(d("50")), "+50.00");
        assert_eq!(format_signed(d("-30")), "-30.00");
        assert_eq!(format_signed(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_sum_is_exact() {
        // 0.1 + 0.2 is exactly 0.3 in decimal, unlike f64
        let total = sum([d("0.1"), d("0.2")]);
        assert_eq!(total, d("0.3"));
    }

    #[test]
    fn test_sum_many_small_amounts_no_drift() {
        let total = sum(std::iter::repeat(d("0.01")).take(1000));
        assert_eq!(total, d("10"));
    }

    #[test]
    fn test_net() {
        assert_eq!(net(d("150"), d("100")), d("50"));
        assert_eq!(net(d("80"), d("100")), d("-20"));
        assert_eq!(net(d("100"), d("100")), Decimal::ZERO);
    }

    #[test]
    fn test_sum_of_nets_equals_net_of_sums() {
        let won = [d("150"), d("80"), d("70")];
        let spent = [d("100"), d("100"), d("100")];

        let per_player: Decimal = won
            .iter()
            .zip(spent.iter())
            .map(|(w, s)| net(*w, *s))
            .sum();
        let totals = net(sum(won), sum(spent));

        assert_eq!(per_player, totals);
        assert_eq!(totals, Decimal::ZERO);
    }
}
