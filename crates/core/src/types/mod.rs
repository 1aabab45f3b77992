//! Core types for Shine Store.
//!
//! This module provides type-safe wrappers for the catalog and account
//! domain.

pub mod filter;
pub mod id;
pub mod product;
pub mod user;

pub use filter::{Condition, NumericRange, ProductFilter, ProductSearch, parse_number};
pub use id::*;
pub use product::{
    DeleteAck, Document, ID_FIELD, InsertAck, ProductField, ProductRecord, UpdateAck, merge_fields,
    strip_key,
};
pub use user::{AccessClaims, NewUser, Role, RoleError, StoredUser};
