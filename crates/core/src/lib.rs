//! Vitrina Core - Shared domain types.
//!
//! This crate provides the validated value types used across the workspace:
//! - `storefront` - Web application and catalog API adapter
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Parsing happens here so that invalid input never reaches the
//! catalog API or the user store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, usernames and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
