//! Rupiah amounts and Indonesian number formatting.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum number of fraction digits shown by [`format_number_id`].
const MAX_FRACTION_DIGITS: u32 = 3;

/// A price in Indonesian rupiah.
///
/// Displays as `Rp. 1.250.000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupiah(Decimal);

impl Rupiah {
    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The raw amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rp. {}", format_number_id(self.0))
    }
}

/// Format a number using the Indonesian locale.
///
/// Thousands are grouped with `.`, the fraction is separated by `,`, at most
/// three fraction digits are kept (banker's rounding) and trailing zeros are
/// dropped.
///
/// ```
/// use apola_core::format_number_id;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_number_id(Decimal::new(125_000_000, 2)), "1.250.000");
/// assert_eq!(format_number_id(Decimal::new(15_005, 1)), "1.500,5");
/// ```
#[must_use]
pub fn format_number_id(value: Decimal) -> String {
    let rounded = value.round_dp(MAX_FRACTION_DIGITS).normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();

    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        out.push('-');
    }

    let len = integer.len();
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }

    out
}

/// Sign, digits and exponent of a numeric literal.
struct NumericParts<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
    exponent: Option<&'a str>,
}

/// Split `input` into its numeric parts, or `None` when it is not a number.
fn split_numeric(input: &str) -> Option<NumericParts<'_>> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first()? {
        b'-' => (true, trimmed.get(1..)?),
        b'+' => (false, trimmed.get(1..)?),
        _ => (false, trimmed),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => (unsigned.get(..pos)?, Some(unsigned.get(pos + 1..)?)),
        None => (unsigned, None),
    };

    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
    {
        return None;
    }

    if let Some(exp) = exponent {
        let exp_digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if exp_digits.is_empty() || !all_digits(exp_digits) {
            return None;
        }
    }

    Some(NumericParts {
        negative,
        integer,
        fraction,
        exponent: exponent.map(|exp| exp.strip_prefix('+').unwrap_or(exp)),
    })
}

/// Whether `input` is written as a number.
///
/// Accepts surrounding whitespace, an optional sign, digits with an optional
/// fraction (`5.`, `.5` included) and an optional exponent (`1e3`), however
/// large. Digit separators, `inf` and `NaN` are rejected.
#[must_use]
pub fn is_numeric(input: &str) -> bool {
    split_numeric(input).is_some()
}

/// Parse a submitted numeric string into a decimal.
///
/// Same syntax as [`is_numeric`]. Returns `None` for anything else and for
/// numbers outside the range [`Decimal`] can hold.
#[must_use]
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let parts = split_numeric(input)?;

    let mut normalized = String::with_capacity(input.len() + 3);
    if parts.negative {
        normalized.push('-');
    }
    normalized.push_str(if parts.integer.is_empty() { "0" } else { parts.integer });
    if !parts.fraction.is_empty() {
        normalized.push('.');
        normalized.push_str(parts.fraction);
    }

    match parts.exponent {
        None => Decimal::from_str(&normalized).ok(),
        Some(exp) => Decimal::from_scientific(&format!("{normalized}e{exp}")).ok(),
    }
}

/// Significant digits on each side of the decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalDigits {
    /// Digits before the point, leading zeros excluded.
    pub integer: u64,
    /// Digits after the point, trailing zeros excluded.
    pub fraction: u64,
}

/// Count the significant digits of a numeric string, exponent applied.
///
/// Works on the text, so numbers too large or too precise for [`Decimal`]
/// are still measured. Returns `None` when `input` is not a number.
#[must_use]
pub fn decimal_digits(input: &str) -> Option<DecimalDigits> {
    let parts = split_numeric(input)?;

    let exponent = match parts.exponent {
        None => 0,
        Some(exp) => exp.parse::<i64>().unwrap_or(if exp.starts_with('-') {
            i64::MIN / 2
        } else {
            i64::MAX / 2
        }),
    };

    let digits: Vec<u8> = parts.integer.bytes().chain(parts.fraction.bytes()).collect();
    let Some(first) = digits.iter().position(|&b| b != b'0') else {
        return Some(DecimalDigits {
            integer: 0,
            fraction: 0,
        });
    };
    let last = digits.iter().rposition(|&b| b != b'0').unwrap_or(first);

    let to_i64 = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
    let point = to_i64(parts.integer.len()).saturating_add(exponent);
    let count = |n: i64| u64::try_from(n.max(0)).unwrap_or(0);

    Some(DecimalDigits {
        integer: count(point.saturating_sub(to_i64(first))),
        fraction: count(to_i64(last + 1).saturating_sub(point)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_number_id(Decimal::from(0)), "0");
        assert_eq!(format_number_id(Decimal::from(999)), "999");
        assert_eq!(format_number_id(Decimal::from(1000)), "1.000");
        assert_eq!(format_number_id(Decimal::from(150_000)), "150.000");
        assert_eq!(format_number_id(Decimal::from(12_345_678)), "12.345.678");
    }

    #[test]
    fn test_format_drops_trailing_zero_fraction() {
        assert_eq!(format_number_id(Decimal::new(15_000_000, 2)), "150.000");
        assert_eq!(format_number_id(Decimal::new(250, 2)), "2,5");
    }

    #[test]
    fn test_format_rounds_to_three_digits() {
        assert_eq!(format_number_id(Decimal::new(12_345, 4)), "1,234");
        assert_eq!(format_number_id(Decimal::new(-12_345_006, 3)), "-12.345,006");
    }

    #[test]
    fn test_rupiah_display() {
        let price = Rupiah::new(Decimal::new(125_000_000, 2));
        assert_eq!(price.to_string(), "Rp. 1.250.000");
    }

    #[test]
    fn test_parse_decimal_accepts_numeric_forms() {
        assert_eq!(parse_decimal("150000"), Some(Decimal::from(150_000)));
        assert_eq!(parse_decimal(" 12.50 "), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_decimal("+3"), Some(Decimal::from(3)));
        assert_eq!(parse_decimal("-0.5"), Some(Decimal::new(-5, 1)));
        assert_eq!(parse_decimal(".5"), Some(Decimal::new(5, 1)));
        assert_eq!(parse_decimal("5."), Some(Decimal::from(5)));
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_decimal("2.5E-1"), Some(Decimal::new(25, 2)));
    }

    #[test]
    fn test_parse_decimal_rejects_non_numeric() {
        for input in [
            "", " ", "abc", "12abc", "1,5", "1_000", "1.2.3", ".", "-", "+", "e5", "1e", "1e+",
            "inf", "NaN", "0x1A",
        ] {
            assert_eq!(parse_decimal(input), None, "{input:?} should be rejected");
            assert!(!is_numeric(input), "{input:?} should not be numeric");
        }
    }

    #[test]
    fn test_out_of_range_is_numeric_but_not_decimal() {
        let huge = "1".repeat(32);
        for input in ["1e100", huge.as_str(), "-9e40"] {
            assert!(is_numeric(input), "{input:?} is written as a number");
            assert_eq!(parse_decimal(input), None);
        }
    }

    #[test]
    fn test_decimal_digits_counts_significant_digits() {
        let digits = |input| decimal_digits(input).unwrap();

        assert_eq!(digits("150000"), DecimalDigits { integer: 6, fraction: 0 });
        assert_eq!(digits("  007.250 "), DecimalDigits { integer: 1, fraction: 2 });
        assert_eq!(digits("-0.005"), DecimalDigits { integer: 0, fraction: 3 });
        assert_eq!(digits("0"), DecimalDigits { integer: 0, fraction: 0 });
        assert_eq!(digits("1.5e3"), DecimalDigits { integer: 4, fraction: 0 });
        assert_eq!(digits("25e-3"), DecimalDigits { integer: 0, fraction: 3 });
        assert_eq!(digits("1e100").integer, 101);
        assert_eq!(digits("1e-100").fraction, 100);
        assert_eq!(decimal_digits("12k"), None);
    }
}
