//! Core types for Pocket Cart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod price;

pub use cart::{Cart, CartCommand, CartError};
pub use id::ProductId;
pub use line_item::{LineItem, LineItemError, NewLineItem};
pub use price::{CurrencyCode, CurrencyParseError, Price};
