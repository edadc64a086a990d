// src/common/config.rs
//! Token and signing configuration

use chrono::Duration;
use std::env;
use tracing::warn;

/// Process-wide token configuration.
///
/// Read once at startup and handed to the token service at construction,
/// so tests can run parallel instances with different secrets and domains.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HMAC signing secret shared by access and refresh tokens
    pub jwt_secret: String,
    /// Expected issuer/audience value for access tokens
    pub domain: String,
    /// Access token lifetime (default 15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime, must exceed the access token lifetime
    /// (default 24 hours)
    pub refresh_token_ttl: Duration,
    /// Remaining-lifetime cutoff below which a refresh token may be
    /// exchanged via the API flow (default 30 seconds)
    pub refresh_threshold: Duration,
}

impl AuthConfig {
    /// Builds the configuration from environment variables, falling back to
    /// the documented defaults for anything unset.
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "replace_with_strong_secret".to_string());
        let domain = env::var("DOMAIN").unwrap_or_else(|_| "example.com".to_string());

        let mut access_token_ttl =
            Duration::seconds(env_seconds("ACCESS_TOKEN_TTL_SECS", 15 * 60));
        let mut refresh_token_ttl =
            Duration::seconds(env_seconds("REFRESH_TOKEN_TTL_SECS", 24 * 60 * 60));
        let refresh_threshold = Duration::seconds(env_seconds("REFRESH_THRESHOLD_SECS", 30));

        // Refresh tokens must outlive the access tokens they replace
        if refresh_token_ttl <= access_token_ttl {
            warn!(
                access_ttl_secs = access_token_ttl.num_seconds(),
                refresh_ttl_secs = refresh_token_ttl.num_seconds(),
                "Refresh token TTL must exceed access token TTL, using defaults"
            );
            access_token_ttl = Duration::minutes(15);
            refresh_token_ttl = Duration::hours(24);
        }

        Self {
            jwt_secret,
            domain,
            access_token_ttl,
            refresh_token_ttl,
            refresh_threshold,
        }
    }
}

fn env_seconds(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
