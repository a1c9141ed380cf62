//! Decoding of European formatted numbers
//!
//! Statements print numbers with `.` as thousands separator and `,` as
//! decimal separator (`2.505,00`). The convention is fixed; no locale
//! detection is attempted.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal text that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid decimal number")]
pub struct NumberFormatError {
    /// The text as found in the statement
    pub input: String,
}

/// Decode a number written as `1.234,56`
///
/// Every `.` is removed, then every `,` becomes `.`, then the result is
/// parsed as a plain decimal.
pub fn parse_locale_decimal(text: &str) -> Result<Decimal, NumberFormatError> {
    let cleaned = text.trim().replace('.', "").replace(',', ".");
    parse_plain(&cleaned, text)
}

/// Decode a number from the line-oriented layout
///
/// That layout never uses thousands separators, so only `,` is replaced.
/// `1.000,00` is rejected here while [`parse_locale_decimal`] accepts it.
pub fn parse_legacy_decimal(text: &str) -> Result<Decimal, NumberFormatError> {
    let cleaned = text.trim().replace(',', ".");
    parse_plain(&cleaned, text)
}

fn parse_plain(cleaned: &str, original: &str) -> Result<Decimal, NumberFormatError> {
    let error = || NumberFormatError {
        input: original.to_string(),
    };

    let unsigned = cleaned.strip_prefix(['-', '+']).unwrap_or(cleaned);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    // Decimal::from_str also takes `_` grouping and exponents, statements never do
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if integer.len() + fraction.len() == 0 || !all_digits(integer) || !all_digits(fraction) {
        return Err(error());
    }

    let value = Decimal::from_str(cleaned).map_err(|_| error())?;

    // A fraction longer than the decimal scale would be rounded silently
    if value.scale() as usize != fraction.len() {
        return Err(error());
    }

    Ok(value)
}
