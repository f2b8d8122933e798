use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::settings::LocaleSettings;

/// Digits kept by the masked input; keystrokes past this are ignored.
pub const MAX_MASK_DIGITS: usize = 15;

/// Largest amount an entry may hold: 9 999 999 999 999.99, i.e. the
/// biggest value the masked input can produce (15 digits of cents).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_7FFF, 0x0003_8D7E, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("empty amount")]
    Empty,
    #[error("'{0}' is not a number")]
    InvalidFormat(String),
}

/// Parse a locale-formatted amount into a decimal.
///
/// Thousands separators are dropped and the decimal separator becomes `.`:
/// with the default pt-BR locale `"8.500,00"` -> `8500.00`, `"12,5"` -> `12.5`,
/// `"100"` -> `100`. The sign is kept, so the caller decides about negatives.
pub fn parse_amount(raw: &str, locale: &LocaleSettings) -> Result<Decimal, ParseAmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let canonical: String = trimmed
        .chars()
        .filter(|c| *c != locale.thousands_separator)
        .map(|c| if c == locale.decimal_separator { '.' } else { c })
        .collect();

    Decimal::from_str(&canonical).map_err(|_| ParseAmountError::InvalidFormat(trimmed.to_string()))
}

/// Format a decimal with two places and locale separators: `8500` -> `"8.500,00"`.
pub fn format_amount(amount: Decimal, locale: &LocaleSettings) -> String {
    let rounded = amount.round_dp(2);
    let plain = format!("{:.2}", rounded.abs());
    let (units, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(locale.thousands_separator);
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}{}{cents}", locale.decimal_separator)
}

/// Format with the currency symbol: `8500` -> `"R$ 8.500,00"`, `-12` -> `"-R$ 12,00"`.
pub fn format_currency(amount: Decimal, locale: &LocaleSettings) -> String {
    let body = format_amount(amount.abs(), locale);
    let sign = if amount.round_dp(2).is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{} {body}", locale.currency_symbol)
}

/// Masked amount input: every keystroke is reduced to its digits, read as
/// integer cents and shown again as a locale decimal.
///
/// `"850000"` -> `"8.500,00"`, `"R$ 1,5"` -> `"0,15"`, `""` -> `""`.
pub fn normalize_masked_amount(raw: &str, locale: &LocaleSettings) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_MASK_DIGITS)
        .collect();
    if digits.is_empty() {
        return String::new();
    }

    // at most 15 ASCII digits, always fits in i64
    let cents: i64 = digits.parse().unwrap_or(0);
    format_amount(Decimal::new(cents, 2), locale)
}
