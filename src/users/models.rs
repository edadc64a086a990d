//! User data models

use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;

/// User database model. The password hash never leaves the server; it is
/// skipped during serialization.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    /// Verifies a plaintext password against the stored bcrypt hash.
    pub fn password_matches(&self, plain: &str) -> Result<bool, bcrypt::BcryptError> {
        bcrypt::verify(plain, &self.password)
    }
}

/// Request body for POST /users. Unknown fields are rejected.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// Request body for PUT /users/:user_id. Unknown fields are rejected.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}
