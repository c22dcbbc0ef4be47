//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept as [`Decimal`] so that sums of line totals are exact.
//! Formatting follows the display conventions of each currency's home
//! market: symbol placement, thousands grouping and decimal separator.
//!
//! ```
//! use pocket_cart_core::{CurrencyCode, Price};
//! use rust_decimal::Decimal;
//!
//! let price = Price::new(Decimal::new(123_450, 2), CurrencyCode::USD);
//! assert_eq!(price.display(), "$1,234.50");
//!
//! let price = Price::new(Decimal::new(123_450, 2), CurrencyCode::BRL);
//! assert_eq!(price.display(), "R$ 1.234,50");
//! ```

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        self.currency_code.format_amount(self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Error returned when a currency code is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyParseError(pub String);

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    BRL,
}

impl CurrencyCode {
    /// Currency symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::BRL => "R$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::BRL => "BRL",
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::EUR | Self::BRL => ',',
            Self::USD | Self::GBP | Self::CAD | Self::AUD => '.',
        }
    }

    const fn group_separator(self) -> char {
        match self {
            Self::EUR | Self::BRL => '.',
            Self::USD | Self::GBP | Self::CAD | Self::AUD => ',',
        }
    }

    const fn symbol_separator(self) -> &'static str {
        match self {
            Self::BRL => " ",
            _ => "",
        }
    }

    /// Format an amount with two decimal places in this currency.
    ///
    /// Rounds half away from zero, so `0.005` becomes `0.01`.
    #[must_use]
    pub fn format_amount(self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let fixed = format!("{:.2}", rounded.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        format!(
            "{sign}{}{}{}{}{fraction}",
            self.symbol(),
            self.symbol_separator(),
            group_digits(whole, self.group_separator()),
            self.decimal_separator(),
        )
    }
}

/// Insert `separator` between every group of three digits, from the right.
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "BRL" => Ok(Self::BRL),
            _ => Err(CurrencyParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_formats_as_zero_value() {
        assert_eq!(Price::zero(CurrencyCode::USD).display(), "$0.00");
        assert_eq!(Price::zero(CurrencyCode::BRL).display(), "R$ 0,00");
    }

    #[test]
    fn test_grouping() {
        let usd = CurrencyCode::USD;
        assert_eq!(usd.format_amount(Decimal::new(999, 0)), "$999.00");
        assert_eq!(usd.format_amount(Decimal::new(1000, 0)), "$1,000.00");
        assert_eq!(usd.format_amount(Decimal::new(1_234_567_89, 2)), "$1,234,567.89");
    }

    #[test]
    fn test_european_separators() {
        let amount = Decimal::new(1_234_50, 2);
        assert_eq!(CurrencyCode::EUR.format_amount(amount), "€1.234,50");
        assert_eq!(CurrencyCode::GBP.format_amount(amount), "£1,234.50");
    }

    #[test]
    fn test_rounding() {
        let usd = CurrencyCode::USD;
        assert_eq!(usd.format_amount(Decimal::new(5, 3)), "$0.01");
        assert_eq!(usd.format_amount(Decimal::new(19_994, 3)), "$19.99");
    }

    #[test]
    fn test_negative() {
        assert_eq!(CurrencyCode::USD.format_amount(Decimal::new(-150, 2)), "-$1.50");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!("brl".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert_eq!(" EUR ".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
