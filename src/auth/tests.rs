//! Tests for auth module
//!
//! These tests verify the token lifecycle core:
//! - Sign/verify round trips and claim contents
//! - Tamper detection, expiry enforcement and issuer binding
//! - Bearer header failure taxonomy
//! - Early-refresh gate, cookie rotation and logout

#[cfg(test)]
mod tests {
    use super::super::*;

    use axum::extract::{Extension, Form, Json};
    use axum::http::StatusCode;
    use axum_extra::extract::CookieJar;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::common::{config::AuthConfig, ApiError, AppState};
    use crate::users::models::User;

    fn test_config(domain: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test_secret_key".to_string(),
            domain: domain.to_string(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::hours(24),
            refresh_threshold: Duration::seconds(30),
        }
    }

    fn test_service() -> TokenService {
        TokenService::new(test_config("example.com"))
    }

    fn test_user() -> User {
        User {
            id: 1,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: "admin@example.com".to_string(),
            password: String::new(),
            is_admin: 1,
            created_at: None,
            updated_at: None,
        }
    }

    /// Refresh-style claims with an arbitrary expiry offset from now.
    fn refresh_claims(sub: &str, expires_in: Duration) -> models::Claims {
        models::Claims {
            sub: sub.to_string(),
            name: None,
            iss: None,
            aud: None,
            admin: None,
            exp: (Utc::now() + expires_in).timestamp(),
        }
    }

    // ------------------------------------------------------------------
    // Token service
    // ------------------------------------------------------------------

    #[test]
    fn test_access_token_round_trip() {
        let svc = test_service();
        let pair = svc.issue(&test_user()).expect("issue failed");

        let header = format!("Bearer {}", pair.access_token);
        let (token, claims) = svc.verify_bearer(Some(&header)).expect("verify failed");

        assert_eq!(token, pair.access_token);
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.name.as_deref(), Some("Admin User"));
        assert_eq!(claims.iss.as_deref(), Some("example.com"));
        assert_eq!(claims.aud.as_deref(), Some("example.com"));
        assert_eq!(claims.admin, Some(true));
    }

    #[test]
    fn test_refresh_token_carries_minimal_claims() {
        let svc = test_service();
        let pair = svc.issue(&test_user()).expect("issue failed");

        let access = svc.verify(&pair.access_token).expect("access verify");
        let refresh = svc.verify(&pair.refresh_token).expect("refresh verify");

        assert_eq!(refresh.sub, "1");
        assert!(refresh.name.is_none());
        assert!(refresh.iss.is_none());
        assert!(refresh.aud.is_none());
        assert!(refresh.admin.is_none());
        // refresh tokens must outlive the access tokens they replace
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let svc = test_service();
        let pair = svc.issue(&test_user()).expect("issue failed");

        let mut segments: Vec<String> = pair
            .access_token
            .split('.')
            .map(str::to_string)
            .collect();
        assert_eq!(segments.len(), 3);

        // flip one character of the payload segment
        let flipped = if segments[1].starts_with('A') { "B" } else { "A" };
        segments[1].replace_range(0..1, flipped);
        let tampered = segments.join(".");

        let result = svc.verify(&tampered);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let svc = test_service();
        let pair = svc.issue(&test_user()).expect("issue failed");

        let mut segments: Vec<String> = pair
            .access_token
            .split('.')
            .map(str::to_string)
            .collect();
        let flipped = if segments[2].starts_with('A') { "B" } else { "A" };
        segments[2].replace_range(0..1, flipped);
        let tampered = segments.join(".");

        let result = svc.verify(&tampered);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_is_reported_distinctly() {
        let svc = test_service();
        let claims = refresh_claims("1", Duration::seconds(-60));
        let token = svc.sign(&claims).expect("sign failed");

        // the signature is valid, only the expiry has passed
        let result = svc.verify(&token);
        assert!(matches!(result, Err(TokenError::ExpiredToken)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let svc = test_service();
        let mut other_config = test_config("example.com");
        other_config.jwt_secret = "a_different_secret".to_string();
        let other = TokenService::new(other_config);

        let pair = other.issue(&test_user()).expect("issue failed");
        let result = svc.verify(&pair.access_token);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let svc = test_service();

        // correct secret, wrong issuer
        let claims = models::Claims {
            sub: "1".to_string(),
            name: Some("Admin User".to_string()),
            iss: Some("elsewhere.com".to_string()),
            aud: Some("elsewhere.com".to_string()),
            admin: Some(true),
            exp: (Utc::now() + Duration::minutes(15)).timestamp(),
        };
        let token = svc.sign(&claims).expect("sign failed");

        let header = format!("Bearer {}", token);
        let result = svc.verify_bearer(Some(&header));
        assert!(matches!(result, Err(TokenError::IssuerMismatch)));
    }

    #[test]
    fn test_disallowed_algorithm_is_rejected() {
        let svc = test_service();

        // signed with the right secret but a different HMAC algorithm
        let claims = refresh_claims("1", Duration::hours(1));
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret("test_secret_key".as_bytes()),
        )
        .expect("encode failed");

        let result = svc.verify(&token);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_bearer_header_failure_taxonomy() {
        let svc = test_service();

        assert!(matches!(
            svc.verify_bearer(None),
            Err(TokenError::MissingHeader)
        ));
        assert!(matches!(
            svc.verify_bearer(Some("")),
            Err(TokenError::MissingHeader)
        ));
        assert!(matches!(
            svc.verify_bearer(Some("Bearer")),
            Err(TokenError::MalformedHeader)
        ));
        assert!(matches!(
            svc.verify_bearer(Some("Bearer a b")),
            Err(TokenError::MalformedHeader)
        ));
        assert!(matches!(
            svc.verify_bearer(Some("Basic xyz")),
            Err(TokenError::UnauthorizedScheme)
        ));
    }

    #[test]
    fn test_refresh_eligibility_gate() {
        let svc = test_service();

        // freshly issued: nowhere near expiry
        let fresh = refresh_claims("1", Duration::hours(24));
        assert!(!svc.refresh_eligible(&fresh));

        // inside the 30 second threshold
        let near_expiry = refresh_claims("1", Duration::seconds(10));
        assert!(svc.refresh_eligible(&near_expiry));
    }

    #[test]
    fn test_claims_without_subject_are_rejected() {
        let result = serde_json::from_str::<models::Claims>(r#"{"exp": 9999999999}"#);
        assert!(result.is_err());
    }

    // ------------------------------------------------------------------
    // Cookies
    // ------------------------------------------------------------------

    #[test]
    fn test_refresh_cookie_attributes() {
        let config = test_config("example.com");
        let cookie = cookies::refresh_cookie("sometoken", &config);

        assert_eq!(cookie.name(), "__Host-refresh_token");
        assert_eq!(cookie.value(), "sometoken");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(
            cookie.same_site(),
            Some(axum_extra::extract::cookie::SameSite::Strict)
        );
        let expires = cookie.expires_datetime().expect("no expiry set");
        assert!(expires > time::OffsetDateTime::now_utc());
    }

    #[test]
    fn test_clear_cookie_expires_in_the_past() {
        let config = test_config("example.com");
        let cookie = cookies::clear_refresh_cookie(&config);

        assert_eq!(cookie.name(), "__Host-refresh_token");
        assert_eq!(cookie.value(), "");
        let expires = cookie.expires_datetime().expect("no expiry set");
        assert!(expires < time::OffsetDateTime::now_utc());
    }

    // ------------------------------------------------------------------
    // Handler flows
    // ------------------------------------------------------------------

    async fn test_state() -> Arc<RwLock<AppState>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("pool");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("migrations");

        // low bcrypt cost keeps the tests fast
        let hash = bcrypt::hash("secret", 4).expect("hash");
        sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password, is_admin) VALUES (?, ?, ?, ?, 1)",
        )
        .bind("Admin")
        .bind("User")
        .bind("admin@example.com")
        .bind(&hash)
        .execute(&pool)
        .await
        .expect("seed user");

        let state = AppState {
            db: pool,
            tokens: TokenService::new(test_config("example.com")),
        };
        Arc::new(RwLock::new(state))
    }

    #[tokio::test]
    async fn test_authenticate_sets_cookie_and_returns_pair() {
        let state = test_state().await;
        let svc = { state.read().await.tokens.clone() };

        let (jar, Json(pair)) = handlers::authenticate(
            Extension(state),
            CookieJar::default(),
            Ok(Json(models::LoginRequest {
                email: "admin@example.com".to_string(),
                password: "secret".to_string(),
            })),
        )
        .await
        .expect("login failed");

        let claims = svc.verify(&pair.access_token).expect("access verify");
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.admin, Some(true));

        let cookie = jar.get(cookies::REFRESH_COOKIE).expect("cookie missing");
        assert_eq!(cookie.value(), pair.refresh_token);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_credentials() {
        let state = test_state().await;

        let cases = vec![
            ("admin@example.com", "wrongpassword"),
            ("wrong@email.com", "secret"),
            ("", "secret"),
            ("admin@example.com", ""),
        ];

        for (email, password) in cases {
            let result = handlers::authenticate(
                Extension(state.clone()),
                CookieJar::default(),
                Ok(Json(models::LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                })),
            )
            .await;

            assert!(
                matches!(result, Err(ApiError::Unauthorized(_))),
                "expected Unauthorized for {}/{}",
                email,
                password
            );
        }
    }

    #[tokio::test]
    async fn test_api_refresh_rejects_fresh_token() {
        let state = test_state().await;
        let pair = {
            let s = state.read().await;
            let user = crate::users::repo::get_user(&s.db, 1).await.expect("user");
            s.tokens.issue(&user).expect("issue")
        };

        let result = handlers::refresh(
            Extension(state),
            Form(models::RefreshRequest {
                refresh_token: pair.refresh_token,
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::TooEarly(_))));
    }

    #[tokio::test]
    async fn test_api_refresh_near_expiry_returns_new_pair() {
        let state = test_state().await;
        let (svc, token) = {
            let s = state.read().await;
            let token = s
                .tokens
                .sign(&refresh_claims("1", Duration::seconds(10)))
                .expect("sign");
            (s.tokens.clone(), token)
        };

        let Json(pair) = handlers::refresh(
            Extension(state),
            Form(models::RefreshRequest {
                refresh_token: token,
            }),
        )
        .await
        .expect("refresh failed");

        let claims = svc.verify(&pair.access_token).expect("access verify");
        assert_eq!(claims.sub, "1");
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_api_refresh_rejects_expired_and_garbage_tokens() {
        let state = test_state().await;
        let expired = {
            let s = state.read().await;
            s.tokens
                .sign(&refresh_claims("1", Duration::seconds(-60)))
                .expect("sign")
        };

        for token in [expired.as_str(), "not.a.token"] {
            let result = handlers::refresh(
                Extension(state.clone()),
                Form(models::RefreshRequest {
                    refresh_token: token.to_string(),
                }),
            )
            .await;

            assert!(
                matches!(result, Err(ApiError::BadRequest(_))),
                "expected BadRequest for {}",
                token
            );
        }
    }

    #[tokio::test]
    async fn test_api_refresh_rejects_unknown_subject() {
        let state = test_state().await;
        let token = {
            let s = state.read().await;
            s.tokens
                .sign(&refresh_claims("100", Duration::seconds(10)))
                .expect("sign")
        };

        let result = handlers::refresh(
            Extension(state),
            Form(models::RefreshRequest {
                refresh_token: token,
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_cookie_refresh_rotates_cookie() {
        let state = test_state().await;
        let (config, old_token) = {
            let s = state.read().await;
            let token = s
                .tokens
                .sign(&refresh_claims("1", Duration::minutes(10)))
                .expect("sign");
            (s.tokens.config().clone(), token)
        };

        let jar = CookieJar::default().add(cookies::refresh_cookie(&old_token, &config));

        let (jar, Json(pair)) = handlers::refresh_using_cookie(Extension(state), jar)
            .await
            .expect("cookie refresh failed");

        // rotation: the submitted token is never handed back
        assert_ne!(pair.refresh_token, old_token);
        let cookie = jar.get(cookies::REFRESH_COOKIE).expect("cookie missing");
        assert_eq!(cookie.value(), pair.refresh_token);
    }

    #[tokio::test]
    async fn test_cookie_refresh_without_cookie_is_unauthorized() {
        let state = test_state().await;

        let result = handlers::refresh_using_cookie(Extension(state), CookieJar::default()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_cookie_refresh_rejects_bad_token() {
        let state = test_state().await;
        let config = { state.read().await.tokens.config().clone() };

        let jar = CookieJar::default().add(cookies::refresh_cookie("badtoken", &config));

        let result = handlers::refresh_using_cookie(Extension(state), jar).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let state = test_state().await;

        let (status, jar) =
            handlers::delete_refresh_cookie(Extension(state), CookieJar::default()).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        let cookie = jar.get(cookies::REFRESH_COOKIE).expect("cookie missing");
        assert_eq!(cookie.value(), "");
        let expires = cookie.expires_datetime().expect("no expiry set");
        assert!(expires < time::OffsetDateTime::now_utc());
    }
}
