//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password accounts and bearer tokens
//!
//! Catalog operations live in [`crate::catalog`]; they are a thin adapter
//! over the external API and carry no business rules of their own.

pub mod auth;
