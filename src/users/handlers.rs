//! Protected user CRUD handlers
//!
//! Every handler requires a valid bearer token via the AuthedUser extractor;
//! missing, malformed, invalid, expired and issuer-mismatched tokens all
//! yield 401 before the handler body runs.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{CreateUserRequest, UpdateUserRequest, User};
use super::repo;
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState};

/// GET /users - List all users
pub async fn all_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<User>>, ApiError> {
    let state = state_lock.read().await.clone();

    let users = repo::all_users(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        caller_id = authed.id,
        user_count = users.len(),
        "Users list fetched"
    );

    Ok(Json(users))
}

/// GET /users/:user_id - Get a single user
pub async fn get_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = repo::get_user(&state.db, user_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                warn!(caller_id = authed.id, user_id, "User not found");
                ApiError::BadRequest("user not found".to_string())
            }
            other => ApiError::DatabaseError(other),
        })?;

    Ok(Json(user))
}

/// POST /users - Create a user
///
/// # Response
/// `204 No Content` on success, `400 Bad Request` for malformed JSON or
/// unknown fields.
pub async fn insert_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let Ok(Json(request)) = payload else {
        return Err(ApiError::BadRequest("invalid request body".to_string()));
    };

    let password_hash = bcrypt::hash(
        request.password.as_deref().unwrap_or(""),
        bcrypt::DEFAULT_COST,
    )
    .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))?;

    let new_id = repo::insert_user(&state.db, &request, &password_hash)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        caller_id = authed.id,
        new_user_id = new_id,
        email = %safe_email_log(&request.email),
        "User created"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/:user_id - Update a user
///
/// # Response
/// `204 No Content` on success, `400 Bad Request` for malformed JSON,
/// unknown fields or an unknown user.
pub async fn update_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<i64>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    let Ok(Json(request)) = payload else {
        return Err(ApiError::BadRequest("invalid request body".to_string()));
    };

    let rows = repo::update_user(&state.db, user_id, &request)
        .await
        .map_err(ApiError::DatabaseError)?;

    if rows == 0 {
        warn!(caller_id = authed.id, user_id, "Update failed: user not found");
        return Err(ApiError::BadRequest("user not found".to_string()));
    }

    if let Some(password) = request.password.as_deref() {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))?;
        repo::update_password(&state.db, user_id, &password_hash)
            .await
            .map_err(ApiError::DatabaseError)?;
    }

    info!(caller_id = authed.id, user_id, "User updated");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/:user_id - Delete a user
///
/// # Response
/// `204 No Content`; deleting an already-absent user is not an error.
pub async fn delete_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    repo::delete_user(&state.db, user_id)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(caller_id = authed.id, user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
