//! Bazaar storefront client library.
//!
//! Everything a storefront front end needs apart from rendering: the REST
//! client, persisted client state, observable stores for the session, cart
//! and catalog, localization, navigation guards and media helpers. The
//! `bazaar` command-line tool is one front end built on it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod identity;
pub mod media;
pub mod router;
pub mod state;
pub mod storage;
pub mod stores;

pub use state::AppState;
