//! Shine Store Core - Shared types library.
//!
//! This crate provides the domain types used by the Shine Store components:
//! - `storefront` - Public REST API for the catalog and accounts
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The catalog filter builder lives here so it can be
//! evaluated in process (tests, in-memory store) and compiled to SQL by the
//! storefront alike.
//!
//! # Modules
//!
//! - [`types`] - Document keys, product records, filters, users and claims

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
