//! Observable state containers.
//!
//! Each store owns one concern and publishes its state through a
//! `tokio::sync::watch` channel: an action computes the next state, stores
//! it, and every subscriber sees the change. Stores are cheap to clone and
//! share their state across clones.
//!
//! Actions never propagate API failures past the store boundary except where
//! the caller needs the error value; the display message always lands in the
//! state's `error` field.

pub mod auth;
mod cache;
pub mod cart;
pub mod locale;
pub mod products;

pub use auth::{AuthState, AuthStore};
pub use cart::{CartState, CartStore};
pub use locale::LocaleStore;
pub use products::{ProductsState, ProductsStore};
