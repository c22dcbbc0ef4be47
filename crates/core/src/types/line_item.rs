//! Cart line items.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Errors that can occur when building a [`LineItem`] or [`NewLineItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineItemError {
    /// The product ID is empty.
    #[error("product id cannot be empty")]
    EmptyId,
    /// The unit price is below zero.
    #[error("unit price cannot be negative: {0}")]
    NegativePrice(Decimal),
}

/// A product about to be added to the cart.
///
/// Carries no quantity: a product enters the cart with a quantity of one,
/// or bumps the existing entry by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    id: ProductId,
    title: String,
    image_url: String,
    unit_price: Decimal,
}

impl NewLineItem {
    /// Create a new line item descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::NegativePrice`] if `unit_price` is below zero.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        image_url: impl Into<String>,
        unit_price: Decimal,
    ) -> Result<Self, LineItemError> {
        if unit_price < Decimal::ZERO {
            return Err(LineItemError::NegativePrice(unit_price));
        }
        Ok(Self {
            id,
            title: title.into(),
            image_url: image_url.into(),
            unit_price,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Turn the descriptor into a cart entry with a quantity of one.
    #[must_use]
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            unit_price: self.unit_price,
            quantity: NonZeroU32::MIN,
        }
    }
}

/// One product's entry in the cart.
///
/// The quantity is never zero: an entry that would drop to zero is removed
/// from the cart instead. Entries are values; quantity changes produce a new
/// `LineItem` rather than touching one held by an older cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineItemRecord", into = "LineItemRecord")]
pub struct LineItem {
    id: ProductId,
    title: String,
    image_url: String,
    unit_price: Decimal,
    quantity: NonZeroU32,
}

impl LineItem {
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .saturating_mul(Decimal::from(self.quantity.get()))
    }

    /// A copy of this entry with one more unit. Saturates at `u32::MAX`.
    #[must_use]
    pub fn incremented(&self) -> Self {
        Self {
            quantity: self.quantity.saturating_add(1),
            ..self.clone()
        }
    }

    /// A copy of this entry with one unit fewer, or `None` if that would
    /// leave it empty.
    #[must_use]
    pub fn decremented(&self) -> Option<Self> {
        NonZeroU32::new(self.quantity.get() - 1).map(|quantity| Self {
            quantity,
            ..self.clone()
        })
    }
}

/// Wire shape of a persisted line item.
///
/// Field names are camelCase. Older records used `image_url` and `price`;
/// both are still accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRecord {
    id: ProductId,
    title: String,
    #[serde(alias = "image_url", default)]
    image_url: String,
    #[serde(alias = "price")]
    unit_price: Decimal,
    quantity: NonZeroU32,
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = LineItemError;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        let item = NewLineItem::new(record.id, record.title, record.image_url, record.unit_price)?;
        Ok(Self {
            quantity: record.quantity,
            ..item.into_line_item()
        })
    }
}

impl From<LineItem> for LineItemRecord {
    fn from(item: LineItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}
