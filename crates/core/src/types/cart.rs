//! The cart and its reducer.
//!
//! A [`Cart`] is an ordered, id-keyed list of [`LineItem`]s. Every operation
//! takes `&self` and returns the next cart, leaving the receiver untouched.
//! Stores publish each result as a new snapshot, so a snapshot that has
//! already been handed out never changes.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::line_item::{LineItem, NewLineItem};

/// Errors raised when a list of line items cannot form a cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The same product appears in more than one entry.
    #[error("duplicate cart entry for product {0}")]
    DuplicateId(ProductId),
}

/// A command against the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add a product, or bump its quantity if already present.
    Add(NewLineItem),
    /// Bump the quantity of an existing entry.
    Increment(ProductId),
    /// Lower the quantity of an existing entry, removing it at one.
    Decrement(ProductId),
}

impl CartCommand {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Increment(_) => "increment",
            Self::Decrement(_) => "decrement",
        }
    }

    /// The product the command targets.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        match self {
            Self::Add(item) => item.id(),
            Self::Increment(id) | Self::Decrement(id) => id,
        }
    }
}

/// The ordered collection of line items for the active session.
///
/// Serializes as a plain JSON array of line items. Deserialization rejects
/// arrays that contain the same product twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Apply a command and return the resulting cart.
    #[must_use]
    pub fn apply(&self, command: CartCommand) -> Self {
        match command {
            CartCommand::Add(item) => self.add(item),
            CartCommand::Increment(id) => self.increment(&id),
            CartCommand::Decrement(id) => self.decrement(&id),
        }
    }

    /// Add a product with a quantity of one, or bump the existing entry.
    #[must_use]
    pub fn add(&self, item: NewLineItem) -> Self {
        if self.contains(item.id()) {
            return self.increment(item.id());
        }
        let mut items = self.items.clone();
        items.push(item.into_line_item());
        Self { items }
    }

    /// Bump the quantity of the entry for `id`. Unchanged if absent.
    #[must_use]
    pub fn increment(&self, id: &ProductId) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    item.incremented()
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// Lower the quantity of the entry for `id`, removing it when the
    /// quantity is one. Unchanged if absent.
    #[must_use]
    pub fn decrement(&self, id: &ProductId) -> Self {
        let items = self
            .items
            .iter()
            .filter_map(|item| {
                if item.id() == id {
                    item.decremented()
                } else {
                    Some(item.clone())
                }
            })
            .collect();
        Self { items }
    }

    /// Look up the entry for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of `unit_price × quantity` over all entries.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        {
            let mut seen = HashSet::with_capacity(items.len());
            for item in &items {
                if !seen.insert(item.id()) {
                    return Err(CartError::DuplicateId(item.id().clone()));
                }
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
