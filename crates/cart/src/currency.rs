//! Currency formatting for cart totals.

use pocket_cart_core::{CurrencyCode, Price};
use rust_decimal::Decimal;

/// Formats a money amount for display.
pub trait CurrencyFormat {
    fn format(&self, amount: Decimal) -> String;
}

/// Formats amounts in a fixed currency using that currency's conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyFormatter {
    pub currency: CurrencyCode,
}

impl CurrencyFormatter {
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self { currency }
    }
}

impl CurrencyFormat for CurrencyFormatter {
    fn format(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }
}

impl<F: Fn(Decimal) -> String> CurrencyFormat for F {
    fn format(&self, amount: Decimal) -> String {
        self(amount)
    }
}
