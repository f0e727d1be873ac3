//! Lenient numeric coercion for form input.
//!
//! Every numeric field of a line item or additional tax goes through
//! [`to_number`]. Malformed input never fails: it degrades to a default.

use rust_decimal::Decimal;

use super::types::FieldValue;

/// Largest exponent magnitude applied digit by digit; beyond this the value
/// either overflows or rounds to zero in a 96-bit decimal.
const MAX_EXPONENT: u32 = 56;

/// Coerce a field to a number, using zero for missing or malformed values.
pub fn to_number(value: &FieldValue) -> Decimal {
    to_number_or(value, Decimal::ZERO)
}

/// Coerce a field to a number with an explicit default.
///
/// - `Empty` and the empty string yield `default`.
/// - Numbers pass through unchanged.
/// - Text is parsed by [`parse_decimal`]; no numeric prefix yields `default`.
pub fn to_number_or(value: &FieldValue, default: Decimal) -> Decimal {
    match value {
        FieldValue::Empty => default,
        FieldValue::Number(d) => *d,
        FieldValue::Text(s) if s.is_empty() => default,
        FieldValue::Text(s) => match parse_decimal(s) {
            Some(d) => d,
            None => {
                tracing::trace!(input = %s, %default, "numeric field fell back to default");
                default
            }
        },
    }
}

/// Parse the leading decimal number of `text`.
///
/// Leading whitespace is skipped and anything after the numeric prefix is
/// ignored, so `"12abc"` is 12 and `"12,50"` is 12. Accepts an optional sign,
/// a fractional part and an exponent (`"1.5e3"`). Returns `None` when there
/// is no numeric prefix or the value does not fit a [`Decimal`].
///
/// ```
/// use billeo::core::parse_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_decimal(" 21.5%"), Some(dec!(21.5)));
/// assert_eq!(parse_decimal("-.5"), Some(dec!(-0.5)));
/// assert_eq!(parse_decimal("abc"), None);
/// ```
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &bytes[int_start..pos];

    let mut frac_digits: &[u8] = &[];
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &bytes[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let exponent = parse_exponent(&bytes[pos..]);

    let int_part = trim_leading_zeros(int_digits);
    let frac_part = trim_trailing_zeros(frac_digits);

    let mut mantissa = String::with_capacity(int_part.len() + frac_part.len() + 3);
    if negative {
        mantissa.push('-');
    }
    if int_part.is_empty() {
        mantissa.push('0');
    } else {
        mantissa.push_str(std::str::from_utf8(int_part).ok()?);
    }
    if !frac_part.is_empty() {
        mantissa.push('.');
        mantissa.push_str(std::str::from_utf8(frac_part).ok()?);
    }

    let value: Decimal = mantissa.parse().ok()?;
    apply_exponent(value, exponent)
}

/// Exponent suffix (`e`, `E`, optional sign, digits). A bare `e` is not an
/// exponent and contributes zero.
fn parse_exponent(rest: &[u8]) -> i64 {
    let Some((&marker, rest)) = rest.split_first() else {
        return 0;
    };
    if marker != b'e' && marker != b'E' {
        return 0;
    }

    let (negative, digits) = match rest.first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let mut exponent: i64 = 0;
    let mut seen = false;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        seen = true;
        exponent = exponent.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if !seen {
        return 0;
    }
    if negative { -exponent } else { exponent }
}

fn apply_exponent(value: Decimal, exponent: i64) -> Option<Decimal> {
    if value.is_zero() || exponent == 0 {
        return Some(value);
    }
    if exponent.unsigned_abs() > u64::from(MAX_EXPONENT) {
        // Too small to represent rounds to zero, too large has no value.
        return if exponent < 0 { Some(Decimal::ZERO) } else { None };
    }

    let mut result = value;
    for _ in 0..exponent.unsigned_abs() {
        result = if exponent > 0 {
            result.checked_mul(Decimal::TEN)?
        } else {
            result.checked_div(Decimal::TEN)?
        };
    }
    Some(result)
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().position(|&b| b != b'0').unwrap_or(digits.len());
    &digits[start..]
}

fn trim_trailing_zeros(digits: &[u8]) -> &[u8] {
    let end = digits.iter().rposition(|&b| b != b'0').map_or(0, |i| i + 1);
    &digits[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_decimal("42"), Some(dec!(42)));
        assert_eq!(parse_decimal("0.25"), Some(dec!(0.25)));
        assert_eq!(parse_decimal("+7"), Some(dec!(7)));
        assert_eq!(parse_decimal("-15"), Some(dec!(-15)));
    }

    #[test]
    fn leading_whitespace_and_trailing_garbage() {
        assert_eq!(parse_decimal("  12abc"), Some(dec!(12)));
        assert_eq!(parse_decimal("12,50"), Some(dec!(12)));
        assert_eq!(parse_decimal("3.5 €"), Some(dec!(3.5)));
    }

    #[test]
    fn partial_fractions() {
        assert_eq!(parse_decimal(".5"), Some(dec!(0.5)));
        assert_eq!(parse_decimal("5."), Some(dec!(5)));
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal("-"), None);
    }

    #[test]
    fn exponents() {
        assert_eq!(parse_decimal("1.5e3"), Some(dec!(1500)));
        assert_eq!(parse_decimal("25E-2"), Some(dec!(0.25)));
        assert_eq!(parse_decimal("2e"), Some(dec!(2)));
        assert_eq!(parse_decimal("2e+x"), Some(dec!(2)));
        assert_eq!(parse_decimal("1e-80"), Some(Decimal::ZERO));
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(parse_decimal("1e40"), None);
        assert_eq!(parse_decimal("-7e35"), None);
    }

    #[test]
    fn not_numbers() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("Infinity"), None);
        assert_eq!(parse_decimal("NaN"), None);
    }

    #[test]
    fn long_zero_padding_is_trimmed() {
        assert_eq!(
            parse_decimal("0000000000000000000000000000000001.5000000000000000000000000000000"),
            Some(dec!(1.5))
        );
    }

    #[test]
    fn coercion_defaults() {
        assert_eq!(to_number(&FieldValue::Empty), Decimal::ZERO);
        assert_eq!(to_number(&FieldValue::Text(String::new())), Decimal::ZERO);
        assert_eq!(to_number(&FieldValue::Text("abc".into())), Decimal::ZERO);
        assert_eq!(to_number_or(&FieldValue::Empty, dec!(21)), dec!(21));
        assert_eq!(to_number_or(&"x".into(), dec!(1)), dec!(1));
        assert_eq!(to_number(&FieldValue::Number(dec!(-3.5))), dec!(-3.5));
        assert_eq!(to_number(&"8".into()), dec!(8));
    }
}
