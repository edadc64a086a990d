//! User routes

use axum::{middleware, routing::get, Router};

use super::handlers;
use crate::auth::vary_by_authorization;

/// Creates the users router with all protected CRUD routes
///
/// # Routes
/// - `GET /users` / `POST /users` - List and create users
/// - `GET|PUT|DELETE /users/:user_id` - Single-user operations
pub fn users_routes() -> Router {
    Router::new()
        .route(
            "/users",
            get(handlers::all_users).post(handlers::insert_user),
        )
        .route(
            "/users/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Responses on these routes depend on the Authorization header
        .layer(middleware::from_fn(vary_by_authorization))
}
