//! Floating cart summary.
//!
//! [`CartSummaryView`] is the model behind the floating cart control: it
//! follows the store's snapshots, derives the total price and item count,
//! and opens the cart screen when activated. It never mutates the cart.

use std::sync::Arc;

use pocket_cart_core::Cart;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::debug;

use crate::currency::CurrencyFormat;
use crate::navigation::{CART_SCREEN, Navigator};
use crate::store::CartStore;

/// Aggregates derived from one cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Sum of `unit_price × quantity`.
    pub total_price: Decimal,
    /// `total_price` rendered by the view's formatter.
    pub formatted_total: String,
    /// Sum of quantities.
    pub item_count: u64,
}

impl CartSummary {
    /// Derive the summary of `cart`.
    #[must_use]
    pub fn from_cart(cart: &Cart, formatter: &impl CurrencyFormat) -> Self {
        let total_price = cart.total_price();
        Self {
            formatted_total: formatter.format(total_price),
            total_price,
            item_count: cart.total_quantity(),
        }
    }

    /// Label for the cart button, e.g. "3 items".
    #[must_use]
    pub fn item_label(&self) -> String {
        match self.item_count {
            1 => "1 item".to_string(),
            n => format!("{n} items"),
        }
    }
}

/// Summary view over a [`CartStore`].
///
/// The summary is memoized on the snapshot pointer: it is recomputed only
/// when the store has published a different snapshot since the last call.
pub struct CartSummaryView<F, N> {
    snapshots: watch::Receiver<Arc<Cart>>,
    formatter: F,
    navigator: N,
    memo: Option<(Arc<Cart>, CartSummary)>,
    recomputations: usize,
}

impl<F: CurrencyFormat, N: Navigator> CartSummaryView<F, N> {
    /// Subscribe a new view to `store`.
    pub fn new<S>(store: &CartStore<S>, formatter: F, navigator: N) -> Self {
        Self {
            snapshots: store.subscribe(),
            formatter,
            navigator,
            memo: None,
            recomputations: 0,
        }
    }

    /// Summary of the latest snapshot.
    pub fn summary(&mut self) -> &CartSummary {
        let current = Arc::clone(&self.snapshots.borrow_and_update());

        let memo = match self.memo.take() {
            Some((cart, summary)) if Arc::ptr_eq(&cart, &current) => (cart, summary),
            _ => {
                self.recomputations += 1;
                let summary = CartSummary::from_cart(&current, &self.formatter);
                debug!(
                    item_count = summary.item_count,
                    total = %summary.formatted_total,
                    "Cart summary recomputed"
                );
                (current, summary)
            }
        };

        &self.memo.insert(memo).1
    }

    /// Wait for the store to publish a new snapshot and return its summary.
    ///
    /// Returns `None` once every handle to the store has been dropped.
    pub async fn changed(&mut self) -> Option<&CartSummary> {
        self.snapshots.changed().await.ok()?;
        Some(self.summary())
    }

    /// Label for the cart button.
    pub fn item_label(&mut self) -> String {
        self.summary().item_label()
    }

    /// Activate the control: open the cart screen.
    pub fn open_cart(&self) {
        debug!(screen = CART_SCREEN, "Opening cart screen");
        self.navigator.navigate_to(CART_SCREEN);
    }

    /// How many times the summary has been derived.
    #[must_use]
    pub const fn recompute_count(&self) -> usize {
        self.recomputations
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pocket_cart_core::{CurrencyCode, NewLineItem, ProductId};

    use super::*;
    use crate::currency::CurrencyFormatter;
    use crate::storage::MemoryStorage;

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn product(s: &str, price: i64) -> NewLineItem {
        NewLineItem::new(id(s), format!("Product {s}"), "", Decimal::new(price, 0)).unwrap()
    }

    fn store() -> CartStore<MemoryStorage> {
        CartStore::new(MemoryStorage::new(), "cartItems")
    }

    fn ignore(_: &str) {}

    #[tokio::test]
    async fn test_empty_cart_summary() {
        let store = store();
        let mut view = CartSummaryView::new(&store, CurrencyFormatter::default(), ignore);

        let summary = view.summary();
        assert_eq!(summary.formatted_total, "$0.00");
        assert_eq!(summary.item_count, 0);
        assert_eq!(view.item_label(), "0 items");
    }

    #[tokio::test]
    async fn test_add_same_product_twice() {
        let store = store();
        let mut view = CartSummaryView::new(&store, CurrencyFormatter::default(), ignore);

        store.add_to_cart(product("A", 10)).await;
        store.add_to_cart(product("A", 10)).await;

        let summary = view.summary().clone();
        assert_eq!(summary.total_price, Decimal::new(20, 0));
        assert_eq!(summary.formatted_total, "$20.00");
        assert_eq!(summary.item_count, 2);
        assert_eq!(view.item_label(), "2 items");
    }

    #[tokio::test]
    async fn test_memoized_until_snapshot_changes() {
        let store = store();
        let mut view = CartSummaryView::new(&store, CurrencyFormatter::default(), ignore);

        view.summary();
        view.summary();
        assert_eq!(view.recompute_count(), 1);

        store.increment(&id("nonexistent")).await;
        view.summary();
        assert_eq!(view.recompute_count(), 1);

        store.add_to_cart(product("A", 1)).await;
        assert_eq!(view.summary().item_count, 1);
        view.summary();
        assert_eq!(view.recompute_count(), 2);
    }

    #[tokio::test]
    async fn test_changed_follows_store() {
        let store = store();
        let mut view = CartSummaryView::new(
            &store,
            CurrencyFormatter::new(CurrencyCode::BRL),
            ignore,
        );

        let writer = store.clone();
        let task = tokio::spawn(async move {
            writer.add_to_cart(product("B", 5)).await;
        });

        let summary = view.changed().await.unwrap();
        assert_eq!(summary.formatted_total, "R$ 5,00");
        task.await.unwrap();

        drop(store);
        assert!(view.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_open_cart_navigates_without_mutating() {
        let store = store();
        store.add_to_cart(product("A", 10)).await;

        let visited = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&visited);
        let navigator = move |screen: &str| log.borrow_mut().push(screen.to_owned());
        let view = CartSummaryView::new(&store, CurrencyFormatter::default(), navigator);

        let before = store.products();
        view.open_cart();

        assert_eq!(*visited.borrow(), vec![CART_SCREEN.to_string()]);
        assert!(Arc::ptr_eq(&before, &store.products()));
    }

    #[test]
    fn test_item_label_singular() {
        let summary = CartSummary {
            total_price: Decimal::ONE,
            formatted_total: "$1.00".to_string(),
            item_count: 1,
        };
        assert_eq!(summary.item_label(), "1 item");
    }
}
