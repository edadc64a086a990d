//! # Users Module
//!
//! This module handles all user-related functionality including:
//! - User repository (lookup by id/email for the token flows)
//! - Protected user CRUD operations
//! - Password hashing and verification

pub mod handlers;
pub mod models;
pub mod repo;
pub mod routes;


pub use models::User;
pub use routes::users_routes;
