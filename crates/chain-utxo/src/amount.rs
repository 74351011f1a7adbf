use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::ChainError;

/// Decimal places between BTC/LTC and satoshis/litoshis.
pub const BASE_UNIT_DECIMALS: u32 = 8;

/// Whether `amount` is a plain non-negative decimal string.
///
/// Accepts an optional leading `+`, digits, and at most one `.`:
/// `"1"`, `"1."`, `".5"`, `"+0.25"`. Rejects signs other than `+`,
/// exponents, separators and whitespace.
pub fn is_decimal_amount(amount: &str) -> bool {
    let unsigned = amount.strip_prefix('+').unwrap_or(amount);
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    match unsigned.split_once('.') {
        None => !unsigned.is_empty() && all_digits(unsigned),
        Some((int, frac)) => {
            all_digits(int) && all_digits(frac) && !(int.is_empty() && frac.is_empty())
        }
    }
}

/// Convert a decimal currency amount to integer base units (1e-8).
///
/// The fraction is truncated to 8 digits and the scaled value floored, so
/// the result never rounds up: `"0.123456785"` becomes `12345678`.
pub fn to_base_units(amount: &str) -> Result<u64, ChainError> {
    to_base_units_with_decimals(amount, BASE_UNIT_DECIMALS)
}

/// Convert a decimal amount to base units for a currency with `decimals`
/// fractional digits.
pub fn to_base_units_with_decimals(amount: &str, decimals: u32) -> Result<u64, ChainError> {
    if !is_decimal_amount(amount) {
        return Err(ChainError::InvalidAmount(format!(
            "not a non-negative decimal: {amount:?}"
        )));
    }

    let unsigned = amount.strip_prefix('+').unwrap_or(amount);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let int = if int.is_empty() { "0" } else { int };
    // Truncating the digit string is exact, unlike rounding a parsed value.
    let frac = &frac[..frac.len().min(decimals as usize)];

    let truncated = if frac.is_empty() {
        int.to_string()
    } else {
        format!("{int}.{frac}")
    };

    let value = Decimal::from_str(&truncated)
        .map_err(|e| ChainError::InvalidAmount(format!("{amount}: {e}")))?;

    let scale = 10u64
        .checked_pow(decimals)
        .map(Decimal::from)
        .ok_or_else(|| ChainError::InvalidAmount(format!("unsupported scale 10^{decimals}")))?;

    value
        .checked_mul(scale)
        .map(|scaled| scaled.floor())
        .and_then(|units| units.to_u64())
        .ok_or_else(|| ChainError::InvalidAmount(format!("{amount} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_and_fractional_amounts() {
        assert_eq!(to_base_units("1").unwrap(), 100_000_000);
        assert_eq!(to_base_units("1.5").unwrap(), 150_000_000);
        assert_eq!(to_base_units("0.4995").unwrap(), 49_950_000);
        assert_eq!(to_base_units("0.0005").unwrap(), 50_000);
        assert_eq!(to_base_units("0.00000001").unwrap(), 1);
    }

    #[test]
    fn ninth_digit_is_floored() {
        assert_eq!(to_base_units("0.123456785").unwrap(), 12_345_678);
        assert_eq!(to_base_units("0.999999999").unwrap(), 99_999_999);
        assert_eq!(to_base_units("0.000000009").unwrap(), 0);
    }

    #[test]
    fn very_long_fraction_never_rounds_up() {
        // 40 nines would round to 1.0 if parsed before truncation.
        let amount = format!("0.{}", "9".repeat(40));
        assert_eq!(to_base_units(&amount).unwrap(), 99_999_999);
    }

    #[test]
    fn accepted_shapes() {
        assert_eq!(to_base_units(".5").unwrap(), 50_000_000);
        assert_eq!(to_base_units("2.").unwrap(), 200_000_000);
        assert_eq!(to_base_units("+0.25").unwrap(), 25_000_000);
        assert_eq!(to_base_units("007").unwrap(), 700_000_000);
        assert_eq!(to_base_units("0").unwrap(), 0);
    }

    #[test]
    fn malformed_amounts_are_rejected() {
        for bad in ["", ".", "-1", "-0.5", "1e5", "abc", "1.2.3", " 1", "1 ", "1_000", "0x10", "+"] {
            let err = to_base_units(bad).unwrap_err();
            assert!(
                matches!(err, ChainError::InvalidAmount(_)),
                "expected InvalidAmount for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        // 2^64 satoshis is roughly 1.8e11 BTC.
        assert!(to_base_units("184467440737.09551616").is_err());
        assert_eq!(
            to_base_units("184467440737.09551615").unwrap(),
            u64::MAX
        );
        assert!(to_base_units("99999999999999999999999999999").is_err());
    }

    #[test]
    fn conversion_is_monotonic() {
        let ascending = [
            "0", "0.000000009", "0.00000001", "0.0005", "0.123456785", "0.12345679", "0.4995",
            "1", "1.5", "1.50000001", "21000000",
        ];
        let units: Vec<u64> = ascending.iter().map(|a| to_base_units(a).unwrap()).collect();
        assert!(units.windows(2).all(|w| w[0] <= w[1]), "{units:?}");
    }

    #[test]
    fn custom_decimals() {
        assert_eq!(to_base_units_with_decimals("1.23456", 2).unwrap(), 123);
        assert_eq!(to_base_units_with_decimals("1.23456", 0).unwrap(), 1);
    }

    #[test]
    fn decimal_amount_predicate() {
        assert!(is_decimal_amount("0.0005"));
        assert!(is_decimal_amount(".1"));
        assert!(!is_decimal_amount("."));
        assert!(!is_decimal_amount("-0.1"));
        assert!(!is_decimal_amount("1,5"));
    }
}
