//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - JWT token signing, verification and issuance
//! - Bearer token validation for protected routes
//! - Body-encoded and cookie-based refresh flows
//! - AuthedUser extractor for protected routes

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use extractors::{vary_by_authorization, AuthedUser};
pub use routes::auth_routes;
pub use tokens::{TokenError, TokenService};
