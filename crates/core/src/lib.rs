//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `storefront` - Store containers, API client and localization
//! - `cli` - Terminal front end driving the storefront stores
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, locales, roles, and the cart line map

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
