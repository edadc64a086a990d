// Application state shared across all modules

use sqlx::SqlitePool;

use crate::auth::TokenService;

/// Application state containing the database pool and the token service
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: TokenService,
}
