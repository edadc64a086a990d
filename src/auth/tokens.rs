//! Token signing, verification and issuance
//!
//! The token service is pure over its inputs and the immutable configuration
//! it is constructed with, so concurrent requests sign and verify in
//! parallel without locking.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;

use super::models::{Claims, TokenPair};
use crate::common::{config::AuthConfig, ApiError};
use crate::users::User;

/// Token verification and issuance failures.
///
/// Everything except `Signing` is a client-input or security condition;
/// `Signing` indicates a configuration problem and surfaces as a 500.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no auth header")]
    MissingHeader,
    #[error("invalid auth header")]
    MalformedHeader,
    #[error("unauthorized: no Bearer")]
    UnauthorizedScheme,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("expired token")]
    ExpiredToken,
    #[error("incorrect issuer")]
    IssuerMismatch,
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(_) => ApiError::InternalServer(e.to_string()),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Signs and verifies HS256 tokens with a process-wide secret, and issues
/// access/refresh token pairs for users.
#[derive(Clone)]
pub struct TokenService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Signs a claims set with the process secret.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verifies a token's signature and expiry and decodes its claims.
    ///
    /// Tokens declaring any algorithm other than HS256 are rejected
    /// (algorithm-substitution defense). An expired token with a valid
    /// signature is reported as `ExpiredToken`, distinct from every other
    /// failure, since callers surface it as a client-correctable condition.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // no expected audience is configured, so aud is not validated here;
        // issuer binding is checked by verify_bearer since refresh tokens
        // carry neither iss nor aud

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::ExpiredToken),
                _ => Err(TokenError::InvalidSignature),
            },
        }
    }

    /// Extracts and validates a bearer token from an Authorization header
    /// value, returning the raw token string and its claims.
    ///
    /// Checks run in order: header present, exactly two space-separated
    /// parts, `Bearer` scheme, signature/expiry, and finally that the token
    /// was issued by this application.
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<(String, Claims), TokenError> {
        let header = header
            .filter(|h| !h.is_empty())
            .ok_or(TokenError::MissingHeader)?;

        let parts: Vec<&str> = header.split(' ').collect();
        if parts.len() != 2 {
            return Err(TokenError::MalformedHeader);
        }

        if parts[0] != "Bearer" {
            return Err(TokenError::UnauthorizedScheme);
        }

        let claims = self.verify(parts[1])?;

        // make sure that we issued this token
        if claims.iss.as_deref() != Some(self.config.domain.as_str()) {
            return Err(TokenError::IssuerMismatch);
        }

        Ok((parts[1].to_string(), claims))
    }

    /// Issues an access/refresh token pair for a user.
    ///
    /// The refresh token carries only the subject and expiry so a leaked
    /// long-lived token exposes no identity attributes beyond the user id.
    pub fn issue(&self, user: &User) -> Result<TokenPair, TokenError> {
        let access_claims = Claims {
            sub: user.id.to_string(),
            name: Some(format!("{} {}", user.first_name, user.last_name)),
            iss: Some(self.config.domain.clone()),
            aud: Some(self.config.domain.clone()),
            admin: Some(user.is_admin != 0),
            exp: (Utc::now() + self.config.access_token_ttl).timestamp(),
        };
        let access_token = self.sign(&access_claims)?;

        let refresh_claims = Claims {
            sub: user.id.to_string(),
            name: None,
            iss: None,
            aud: None,
            admin: None,
            exp: (Utc::now() + self.config.refresh_token_ttl).timestamp(),
        };
        let refresh_token = self.sign(&refresh_claims)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Early-refresh gate for the API refresh flow: a refresh token may only
    /// be exchanged once its remaining lifetime drops below the configured
    /// threshold, which bounds how often a leaked token can be exchanged.
    pub fn refresh_eligible(&self, claims: &Claims) -> bool {
        let remaining = claims.exp - Utc::now().timestamp();
        remaining <= self.config.refresh_threshold.num_seconds()
    }
}
