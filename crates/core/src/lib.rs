//! Shoebox Core - Shared types library.
//!
//! This crate provides common types used across all Shoebox components:
//! - `storefront` - Public-facing e-commerce site
//! - `integration-tests` - End-to-end tests and catalog fixtures
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog records, and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
