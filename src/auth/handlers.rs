//! Authentication handlers

use axum::{
    extract::{Extension, Form, Json},
    extract::rejection::JsonRejection,
    http::StatusCode,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::cookies;
use super::models::{LoginRequest, RefreshRequest, TokenPair};
use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};
use crate::users::repo;

/// POST /auth
/// Authenticates a user with email and password
///
/// # Request Body
/// ```json
/// {
///   "email": "admin@example.com",
///   "password": "secret"
/// }
/// ```
///
/// # Response
/// `200 OK` with the token pair and a `Set-Cookie` carrying the refresh
/// token for browser clients; `401 Unauthorized` on any credential failure.
pub async fn authenticate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<TokenPair>), ApiError> {
    let state = state_lock.read().await.clone();

    // Every credential failure is surfaced identically so the endpoint does
    // not leak which part of the login was wrong
    let Ok(Json(credentials)) = payload else {
        warn!("Login failed: request body is not valid JSON");
        return Err(ApiError::Unauthorized("invalid login".to_string()));
    };

    if credentials.email.is_empty() || credentials.password.is_empty() {
        warn!("Login failed: missing email or password");
        return Err(ApiError::Unauthorized("invalid login".to_string()));
    }

    let user = repo::get_user_by_email(&state.db, &credentials.email)
        .await
        .map_err(|e| {
            warn!(
                email = %safe_email_log(&credentials.email),
                error = %e,
                "Login failed: user lookup"
            );
            ApiError::Unauthorized("invalid login".to_string())
        })?;

    let valid = user.password_matches(&credentials.password).map_err(|e| {
        warn!(user_id = user.id, error = %e, "Login failed: password verification error");
        ApiError::Unauthorized("invalid login".to_string())
    })?;

    if !valid {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized("invalid login".to_string()));
    }

    let pair = state.tokens.issue(&user).map_err(ApiError::from)?;

    info!(
        user_id = user.id,
        email = %safe_email_log(&user.email),
        "User authenticated successfully"
    );

    let jar = jar.add(cookies::refresh_cookie(
        &pair.refresh_token,
        state.tokens.config(),
    ));

    Ok((jar, Json(pair)))
}

/// POST /refresh-token
/// Exchanges a refresh token posted as form data for a new token pair
///
/// # Response
/// `200 OK` with the new pair, `400 Bad Request` for an unparseable or
/// expired token or an unknown subject, `425 Too Early` when the token is
/// not yet close enough to its own expiry.
pub async fn refresh(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Form(payload): Form<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let state = state_lock.read().await.clone();

    let pair = exchange_refresh_token(&state, &payload.refresh_token, true).await?;

    Ok(Json(pair))
}

/// GET /refresh
/// Exchanges the refresh token carried in the hardened cookie for a new
/// token pair, rotating the cookie
///
/// # Response
/// `200 OK` with the new pair and a replacement `Set-Cookie`,
/// `401 Unauthorized` when the cookie is missing, `400 Bad Request` for an
/// invalid token or unknown subject.
pub async fn refresh_using_cookie(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenPair>), ApiError> {
    let state = state_lock.read().await.clone();

    let cookie = jar.get(cookies::REFRESH_COOKIE).ok_or_else(|| {
        warn!("Cookie refresh failed: no refresh cookie present");
        ApiError::Unauthorized("no refresh cookie".to_string())
    })?;

    // Browser sessions refresh opportunistically, so the eligibility gate
    // is disabled for this transport
    let pair = exchange_refresh_token(&state, cookie.value(), false).await?;

    let jar = jar.add(cookies::refresh_cookie(
        &pair.refresh_token,
        state.tokens.config(),
    ));

    Ok((jar, Json(pair)))
}

/// GET /logout
/// Clears the refresh cookie by replacing it with an immediately-expired one
///
/// # Response
/// `202 Accepted` with a `Set-Cookie` whose expiry is in the past. This
/// operation cannot fail.
pub async fn delete_refresh_cookie(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
) -> (StatusCode, CookieJar) {
    let state = state_lock.read().await.clone();

    info!("User logout, clearing refresh cookie");

    let jar = jar.add(cookies::clear_refresh_cookie(state.tokens.config()));

    (StatusCode::ACCEPTED, jar)
}

/// Shared refresh core: Parse -> EligibilityCheck (optional) -> Reissue.
///
/// Both transports run the same protocol; the form-encoded API flow enables
/// the early-refresh gate, the cookie flow does not.
pub(super) async fn exchange_refresh_token(
    state: &AppState,
    token: &str,
    enforce_gate: bool,
) -> Result<TokenPair, ApiError> {
    // Parse: garbage and expired tokens alike are a 400 here
    let claims = state.tokens.verify(token).map_err(|e| {
        debug!(
            token = %safe_token_log(token),
            error = %e,
            "Refresh token rejected"
        );
        ApiError::BadRequest("invalid refresh token".to_string())
    })?;

    if enforce_gate && !state.tokens.refresh_eligible(&claims) {
        debug!(sub = %claims.sub, "Refresh token not yet eligible for exchange");
        return Err(ApiError::TooEarly(
            "refresh token not yet eligible for exchange".to_string(),
        ));
    }

    // Reissue: resolve the subject and mint a fresh pair
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest("invalid subject".to_string()))?;

    let user = repo::get_user(&state.db, user_id).await.map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            warn!(user_id, "Refresh failed: subject no longer exists");
            ApiError::BadRequest("unknown user".to_string())
        }
        other => ApiError::DatabaseError(other),
    })?;

    let pair = state.tokens.issue(&user).map_err(ApiError::from)?;

    info!(user_id, "Token pair reissued via refresh");

    Ok(pair)
}
