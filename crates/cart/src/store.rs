//! The cart state provider.
//!
//! [`CartStore`] owns the canonical cart snapshot and the storage record
//! that mirrors it. Every command runs the same pipeline under one async
//! lock:
//!
//! 0. hydrate from storage, if that has not happened yet
//! 1. apply the command to the current snapshot, producing a new [`Cart`]
//! 2. publish the new snapshot to subscribers (skipped when nothing changed)
//! 3. serialize that same snapshot and write it under the storage key
//!
//! Because the write happens under the lock that produced the snapshot,
//! records land in command order and the persisted cart always equals the
//! newest published one once the command returns.
//!
//! Write failures are not returned to the caller. They are logged, the
//! store is marked as having unsaved changes, and the next command (or an
//! explicit [`CartStore::flush`]) rewrites the whole snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pocket_cart_core::{Cart, CartCommand, NewLineItem, ProductId};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

/// Outcome of [`CartStore::hydrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A stored cart replaced the in-memory one.
    Restored {
        /// Number of distinct products restored.
        line_items: usize,
    },
    /// No record exists under the key.
    Missing,
    /// A record exists but could not be parsed; it was ignored.
    Discarded,
    /// The storage read failed; the cart was left as it was.
    ReadFailed,
    /// Hydration already ran for this store.
    AlreadyHydrated,
}

/// Handle to the shared cart state.
///
/// Cheap to clone; all clones see the same snapshot and storage.
pub struct CartStore<S> {
    inner: Arc<CartStoreInner<S>>,
}

struct CartStoreInner<S> {
    storage: S,
    key: String,
    snapshot: watch::Sender<Arc<Cart>>,
    commands: Mutex<()>,
    hydrated: AtomicBool,
    unsaved: AtomicBool,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("line_items", &self.inner.snapshot.borrow().len())
            .field("hydrated", &self.is_hydrated())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Create a store with an empty cart that has not been hydrated.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Cart::new()));
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                key: key.into(),
                snapshot,
                commands: Mutex::new(()),
                hydrated: AtomicBool::new(false),
                unsaved: AtomicBool::new(false),
            }),
        }
    }

    /// Create a store and hydrate it from storage before returning.
    pub async fn open(storage: S, key: impl Into<String>) -> Self {
        let store = Self::new(storage, key);
        store.hydrate().await;
        store
    }

    /// Hydrate in a background task.
    ///
    /// The store is usable immediately; subscribers see the restored cart
    /// once the task completes. A command issued before the task runs loads
    /// the record itself and applies on top of it.
    pub fn spawn_hydration(&self) -> JoinHandle<Hydration> {
        let store = self.clone();
        info!(key = %self.inner.key, "Spawning cart hydration task");
        tokio::spawn(async move { store.hydrate().await })
    }

    /// Load the stored cart once.
    ///
    /// A valid record replaces the in-memory cart wholesale. A missing,
    /// unreadable or corrupt record leaves it unchanged. Only the first call
    /// touches storage. Commands and [`CartStore::flush`] hydrate first if
    /// this has not run yet, so a command never overwrites a record that was
    /// not loaded.
    pub async fn hydrate(&self) -> Hydration {
        let _guard = self.inner.commands.lock().await;
        self.hydrate_locked().await
    }

    /// Hydration body; the caller holds the command lock.
    #[instrument(skip(self), fields(key = %self.inner.key))]
    async fn hydrate_locked(&self) -> Hydration {
        if self.inner.hydrated.swap(true, Ordering::AcqRel) {
            return Hydration::AlreadyHydrated;
        }

        let outcome = match self.inner.storage.get_item(&self.inner.key).await {
            Ok(None) => Hydration::Missing,
            Ok(Some(raw)) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => {
                    let line_items = cart.len();
                    self.inner.snapshot.send_replace(Arc::new(cart));
                    Hydration::Restored { line_items }
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable cart record");
                    Hydration::Discarded
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to read cart record");
                Hydration::ReadFailed
            }
        };

        info!(?outcome, "Cart hydration finished");
        outcome
    }

    /// Add a product with a quantity of one, or bump its existing entry.
    pub async fn add_to_cart(&self, item: NewLineItem) {
        self.dispatch(CartCommand::Add(item)).await;
    }

    /// Bump the quantity of `id`. Absent ids leave the cart unchanged.
    pub async fn increment(&self, id: &ProductId) {
        self.dispatch(CartCommand::Increment(id.clone())).await;
    }

    /// Lower the quantity of `id`, removing the entry at one. Absent ids
    /// leave the cart unchanged.
    pub async fn decrement(&self, id: &ProductId) {
        self.dispatch(CartCommand::Decrement(id.clone())).await;
    }

    /// Apply a command, publish the result, and persist it.
    ///
    /// The record is written even when the command changes nothing.
    #[instrument(
        skip(self, command),
        fields(key = %self.inner.key, command = command.name(), product_id = %command.product_id())
    )]
    pub async fn dispatch(&self, command: CartCommand) {
        let _guard = self.inner.commands.lock().await;
        self.hydrate_locked().await;

        let current = self.products();
        let next = current.apply(command);
        let next = if next == *current {
            debug!("Command left cart unchanged");
            current
        } else {
            let next = Arc::new(next);
            self.inner.snapshot.send_replace(Arc::clone(&next));
            debug!(
                line_items = next.len(),
                item_count = next.total_quantity(),
                "Cart updated"
            );
            next
        };

        if let Err(e) = self.persist(&next).await {
            warn!(error = %e, "Failed to persist cart, will retry on next change");
        }
    }

    /// Write the current snapshot to storage.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails. The store stays marked
    /// as having unsaved changes.
    #[instrument(skip(self), fields(key = %self.inner.key))]
    pub async fn flush(&self) -> Result<(), StorageError> {
        let _guard = self.inner.commands.lock().await;
        self.hydrate_locked().await;
        let current = self.products();
        self.persist(&current).await
    }

    async fn persist(&self, cart: &Cart) -> Result<(), StorageError> {
        let result = match serde_json::to_string(cart) {
            Ok(record) => self.inner.storage.set_item(&self.inner.key, &record).await,
            Err(e) => Err(StorageError::from(e)),
        };
        self.inner.unsaved.store(result.is_err(), Ordering::Release);
        result
    }
}

impl<S> CartStore<S> {
    /// The current cart snapshot.
    #[must_use]
    pub fn products(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.snapshot.borrow())
    }

    /// Subscribe to snapshot changes.
    ///
    /// The receiver starts at the current snapshot and is notified each time
    /// a command or hydration publishes a new one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.snapshot.subscribe()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.inner.hydrated.load(Ordering::Acquire)
    }

    /// Whether the last write failed and has not been retried successfully.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.unsaved.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }
}
