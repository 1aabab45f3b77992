//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Password registration, login and access tokens
//! - `catalog` - Product listings, search and document CRUD

pub mod auth;
pub mod catalog;

pub use auth::{AuthError, AuthService, TokenError, TokenIssuer};
pub use catalog::{CatalogService, TRENDING_LIMIT};
