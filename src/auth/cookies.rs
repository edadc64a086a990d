//! Refresh token cookie builders for the browser flow
//!
//! The cookie uses the browser-enforced `__Host-` prefix and is hardened
//! with HttpOnly, Secure and SameSite=Strict. It is replaced on every
//! successful refresh and cleared with a past expiry on logout.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use crate::common::AuthConfig;

/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "__Host-refresh_token";

/// Build the hardened refresh token cookie.
pub fn refresh_cookie(token: &str, config: &AuthConfig) -> Cookie<'static> {
    let max_age = Duration::seconds(config.refresh_token_ttl.num_seconds());
    Cookie::build((REFRESH_COOKIE, token.to_string()))
        .path("/")
        .domain(config.domain.clone())
        .expires(OffsetDateTime::now_utc() + max_age)
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Build an immediately-expired refresh cookie, instructing the client to
/// discard the stored token.
pub fn clear_refresh_cookie(config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, ""))
        .path("/")
        .domain(config.domain.clone())
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(Duration::seconds(-1))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}
