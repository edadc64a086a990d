//! Authentication data models

use serde::{Deserialize, Serialize};

/// JWT claims structure shared by access and refresh tokens.
///
/// Access tokens carry the full set; refresh tokens carry only `sub` and
/// `exp`, so the identity attributes stay optional and are omitted from the
/// payload when absent. A payload without `sub` fails deserialization.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    pub exp: i64,
}

/// Access/refresh token pair returned to clients
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Credentials posted to POST /auth
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Form body posted to POST /refresh-token
#[derive(Deserialize, Debug)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
