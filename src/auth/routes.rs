//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /auth` - Email/password login, returns a token pair
/// - `POST /refresh-token` - Body-encoded refresh flow for API clients
/// - `GET /refresh` - Cookie-based refresh flow for browser clients
/// - `GET /logout` - Clears the refresh cookie
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth", post(handlers::authenticate))
        .route("/refresh-token", post(handlers::refresh))
        .route("/refresh", get(handlers::refresh_using_cookie))
        .route("/logout", get(handlers::delete_refresh_cookie))
}
