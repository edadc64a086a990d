//! User repository over the SQLite pool
//!
//! The token core resolves refresh subjects through `get_user`; everything
//! else backs the protected CRUD surface.

use sqlx::SqlitePool;

use super::models::{CreateUserRequest, UpdateUserRequest, User};

pub async fn all_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY last_name, first_name")
        .fetch_all(pool)
        .await
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
}

/// Inserts a new user and returns its id. The caller supplies an
/// already-hashed password.
pub async fn insert_user(
    pool: &SqlitePool,
    request: &CreateUserRequest,
    password_hash: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (first_name, last_name, email, password, is_admin)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(&request.email)
    .bind(password_hash)
    .bind(request.is_admin.unwrap_or(false) as i64)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Updates a user's profile fields, returning the number of affected rows.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    request: &UpdateUserRequest,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, email = ?,
            is_admin = COALESCE(?, is_admin),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(&request.email)
    .bind(request.is_admin.map(|a| a as i64))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Replaces a user's password hash.
pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET password = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
