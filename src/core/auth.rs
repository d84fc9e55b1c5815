//! Caller identity for snapgraph
//!
//! Requests carry an optional `Authorization: Bearer <jwt>` header. The
//! [`Caller`] extractor turns it into a [`CallerContext`]:
//! - no header: anonymous caller
//! - valid token: authenticated user
//! - anything else: `401 Unauthenticated`
//!
//! Core operations never look at headers; they receive the caller id as an
//! explicit `Option<Uuid>` or `Uuid` argument.

use crate::config::AuthConfig;
use crate::core::error::{SocialError, SocialResult};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Who is making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerContext {
    /// No credentials supplied
    Anonymous,

    /// Authenticated user
    User { user_id: Uuid },
}

impl CallerContext {
    /// Get user_id if available
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            CallerContext::User { user_id } => Some(*user_id),
            CallerContext::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, CallerContext::Anonymous)
    }

    /// Identity required by mutations
    pub fn require_user(&self) -> SocialResult<Uuid> {
        self.user_id()
            .ok_or_else(|| SocialError::unauthenticated("Authentication required"))
    }
}

/// JWT claims issued for a user session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signs and verifies HS256 session tokens
pub struct JwtCodec {
    issuer: String,
    ttl_seconds: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtCodec {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            issuer: issuer.into(),
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.issuer.clone(), config.token_ttl_seconds)
    }

    /// Issue a token for `user_id` with the configured lifetime
    pub fn issue(&self, user_id: Uuid) -> SocialResult<String> {
        self.issue_with_ttl(user_id, self.ttl_seconds)
    }

    pub fn issue_with_ttl(&self, user_id: Uuid, ttl_seconds: i64) -> SocialResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SocialError::internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> SocialResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| SocialError::unauthenticated(format!("Invalid token: {e}")))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| SocialError::unauthenticated("Invalid token subject"))
    }
}

/// Axum extractor yielding the request's [`CallerContext`]
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub CallerContext);

impl Caller {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.user_id()
    }

    pub fn require_user(&self) -> SocialResult<Uuid> {
        self.0.require_user()
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
    Arc<JwtCodec>: FromRef<S>,
{
    type Rejection = SocialError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller(CallerContext::Anonymous));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SocialError::unauthenticated("Malformed Authorization header"))?;

        let codec = Arc::<JwtCodec>::from_ref(state);
        let user_id = codec.verify(token)?;

        Ok(Caller(CallerContext::User { user_id }))
    }
}
