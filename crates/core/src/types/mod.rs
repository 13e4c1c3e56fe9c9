//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod locale;
pub mod role;

pub use cart::CartLines;
pub use id::*;
pub use locale::{Locale, LocaleError};
pub use role::{RoleError, UserRole};
