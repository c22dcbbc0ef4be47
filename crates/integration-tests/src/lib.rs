//! Integration tests for Pocket Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `relaunch` - Cart survives a process restart through file storage
//! - `floating_cart` - Summary view driven by store commands end to end
//!
//! Shared fixtures live here.

use pocket_cart::{CartStore, FileStorage};
use pocket_cart_core::{NewLineItem, ProductId};
use rust_decimal::Decimal;

/// Storage key used by every test.
pub const KEY: &str = "cartItems";

/// Build a product descriptor with a whole-number price.
///
/// # Panics
///
/// Panics if `id` is empty or `price` is negative.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(id: &str, price: i64) -> NewLineItem {
    NewLineItem::new(
        ProductId::parse(id).unwrap(),
        format!("Product {id}"),
        format!("https://img.example/{id}.png"),
        Decimal::new(price, 0),
    )
    .unwrap()
}

/// Open and hydrate a file-backed store rooted at `dir`, as an app launch would.
pub async fn launch(dir: &std::path::Path) -> CartStore<FileStorage> {
    CartStore::open(FileStorage::new(dir), KEY).await
}
