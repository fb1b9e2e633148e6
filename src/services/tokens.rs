// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT issuance and verification.
//!
//! Both services share this module: the identity service signs access and
//! refresh tokens, the memo service only verifies access tokens. Verification
//! takes the current time as an argument and performs no I/O.

use crate::config::Config;
use crate::error::AppError;
use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which of the two token kinds a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Access or refresh
    pub token_type: TokenKind,
    /// Identity service user ID
    pub user_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Reasons a presented token is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("no bearer token supplied")]
    Missing,
    #[error("token failed verification")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("token is missing a required claim")]
    Malformed,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => AppError::Unauthorized,
            TokenError::Invalid => AppError::InvalidToken,
            TokenError::Expired => AppError::ExpiredToken,
            TokenError::Malformed => AppError::MalformedToken,
        }
    }
}

/// Access + refresh token pair returned on login and registration.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies tokens with one secret and algorithm.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_algorithm,
            config.access_token_ttl,
            config.refresh_token_ttl,
        )
    }

    /// Sign a single token for `user_id`, valid from `now`.
    pub fn issue(&self, user_id: i64, kind: TokenKind, now: i64) -> Result<String, AppError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            token_type: kind,
            user_id,
            iat: now,
            exp: now + ttl.num_seconds(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Sign an access and a refresh token for `user_id`.
    pub fn issue_pair(&self, user_id: i64, now: i64) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access, now)?,
            refresh: self.issue(user_id, TokenKind::Refresh, now)?,
        })
    }

    /// Mint a new access token from a valid refresh token.
    pub fn refresh_access(&self, refresh_token: &str, now: i64) -> Result<String, AppError> {
        let user_id = self.verify(refresh_token, TokenKind::Refresh, now)?;
        self.issue(user_id, TokenKind::Access, now)
    }

    /// Verify an access token and return the user it was issued to.
    pub fn verify_access(&self, token: &str, now: i64) -> Result<i64, TokenError> {
        self.verify(token, TokenKind::Access, now)
    }

    /// Verify signature, expiry, user claim and token kind, in that order.
    pub fn verify(&self, token: &str, expected: TokenKind, now: i64) -> Result<i64, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        // Expiry is checked below against the caller's clock.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Map<String, Value>>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                _ => TokenError::Invalid,
            })?
            .claims;

        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(TokenError::Malformed)?;
        if exp <= now {
            return Err(TokenError::Expired);
        }

        let user_id = claims
            .get("user_id")
            .and_then(Value::as_i64)
            .ok_or(TokenError::Malformed)?;

        let kind = claims.get("token_type").and_then(Value::as_str);
        if kind != Some(expected.as_str()) {
            return Err(TokenError::Invalid);
        }

        Ok(user_id)
    }
}
