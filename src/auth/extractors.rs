//! Authentication extractors and middleware for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts, Request},
    http::{
        header::{HeaderValue, AUTHORIZATION, VARY},
        request::Parts,
    },
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::common::{ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the bearer token from the Authorization header and exposes the
/// identity embedded in the access token claims. No database lookup happens
/// here; validity is entirely determined by the signature and expiry.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: i64,
    pub name: String,
    pub is_admin: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Extension containing the AppState
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let (_, claims) = app_state.tokens.verify_bearer(header).map_err(|e| {
            warn!(error = %e, "Authentication failed: bearer token rejected");
            ApiError::from(e)
        })?;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Unauthorized("invalid subject".to_string()))?;

        Ok(AuthedUser {
            id,
            name: claims.name.unwrap_or_default(),
            is_admin: claims.admin.unwrap_or(false),
        })
    }
}

/// Middleware advertising that responses vary by the Authorization header.
///
/// Applied to every route that reads the header, regardless of the outcome
/// of verification, so shared caches never serve one caller's response to
/// another.
pub async fn vary_by_authorization(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .append(VARY, HeaderValue::from_static("Authorization"));
    response
}
