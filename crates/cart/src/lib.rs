//! Pocket Cart library.
//!
//! The cart state provider and the floating cart summary, as a library that
//! a mobile shell (or the `pc-cli` binary) drives.
//!
//! # Architecture
//!
//! - [`store::CartStore`] - owns the canonical cart snapshot, applies
//!   commands, and writes every new snapshot to a [`storage::KeyValueStorage`]
//! - [`summary::CartSummaryView`] - subscribes to the store and derives the
//!   total price and item count for the floating cart control
//! - [`config::CartConfig`] - storage location, key and display currency
//!
//! Consumers receive a `CartStore` handle explicitly; there is no ambient
//! lookup that can fail at runtime.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod currency;
pub mod error;
pub mod navigation;
pub mod storage;
pub mod store;
pub mod summary;

pub use config::CartConfig;
pub use currency::{CurrencyFormat, CurrencyFormatter};
pub use error::{ConfigError, StorageError};
pub use navigation::{CART_SCREEN, Navigator};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{CartStore, Hydration};
pub use summary::{CartSummary, CartSummaryView};
