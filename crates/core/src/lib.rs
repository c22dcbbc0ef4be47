//! Pocket Cart Core - Shared cart types.
//!
//! This crate provides the value types used by every Pocket Cart component:
//! - `pocket-cart` - Cart store, persistence and the floating summary view
//! - `pocket-cart-cli` - Command-line access to a persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no async runtime. Every cart operation returns a new
//! [`Cart`] instead of mutating in place, so snapshots handed to readers
//! never change underneath them.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, line items and the cart reducer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
