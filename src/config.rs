//! Application configuration loaded from environment variables.
//!
//! Both services read the same configuration; the token secret and algorithm
//! must match for tokens issued by the identity service to verify in the
//! memo service.

use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::env;

const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 5 * 60;
const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Memo service port
    pub memo_port: u16,
    /// Identity service port
    pub identity_port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,

    // --- Token signing ---
    /// HMAC secret shared by both services (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Signing algorithm (HMAC family only)
    pub jwt_algorithm: Algorithm,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            memo_port: 8000,
            identity_port: 8001,
            frontend_url: "http://localhost:5173".to_string(),
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            jwt_algorithm: Algorithm::HS256,
            access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECS),
            refresh_token_ttl: Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?
            .into_bytes();

        let jwt_algorithm = match lookup("JWT_ALGORITHM") {
            Some(raw) => parse_algorithm(raw.trim())?,
            None => Algorithm::HS256,
        };

        Ok(Self {
            memo_port: parse_or(&lookup, "MEMO_PORT", 8000)?,
            identity_port: parse_or(&lookup, "IDENTITY_PORT", 8001)?,
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            jwt_secret,
            jwt_algorithm,
            access_token_ttl: parse_ttl(
                &lookup,
                "ACCESS_TOKEN_TTL_SECS",
                DEFAULT_ACCESS_TOKEN_TTL_SECS,
            )?,
            refresh_token_ttl: parse_ttl(
                &lookup,
                "REFRESH_TOKEN_TTL_SECS",
                DEFAULT_REFRESH_TOKEN_TTL_SECS,
            )?,
        })
    }
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm: Algorithm = raw
        .parse()
        .map_err(|_| ConfigError::Invalid("JWT_ALGORITHM", format!("unknown algorithm {raw}")))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(ConfigError::Invalid(
            "JWT_ALGORITHM",
            format!("{raw} needs a key pair; only HS256, HS384 and HS512 are supported"),
        )),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(key, format!("cannot parse {raw:?}"))),
        None => Ok(default),
    }
}

fn parse_ttl<F>(lookup: &F, key: &'static str, default_secs: i64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: i64 = parse_or(lookup, key, default_secs)?;
    if secs <= 0 {
        return Err(ConfigError::Invalid(key, "must be positive".to_string()));
    }
    Ok(Duration::seconds(secs))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("JWT_SECRET_KEY", "secret")])).expect("loads");

        assert_eq!(config.jwt_secret, b"secret");
        assert_eq!(config.jwt_algorithm, Algorithm::HS256);
        assert_eq!(config.memo_port, 8000);
        assert_eq!(config.identity_port, 8001);
        assert_eq!(config.access_token_ttl, Duration::minutes(5));
        assert_eq!(config.refresh_token_ttl, Duration::days(1));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("JWT_ALGORITHM", "HS512"),
            ("MEMO_PORT", "9000"),
            ("ACCESS_TOKEN_TTL_SECS", "60"),
        ]))
        .expect("loads");

        assert_eq!(config.jwt_algorithm, Algorithm::HS512);
        assert_eq!(config.memo_port, 9000);
        assert_eq!(config.access_token_ttl, Duration::seconds(60));
    }

    #[test]
    fn test_missing_secret() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET_KEY")));

        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET_KEY", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET_KEY")));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("JWT_ALGORITHM", "RS256"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("JWT_ALGORITHM", _)));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET_KEY", "secret"),
            ("REFRESH_TOKEN_TTL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("REFRESH_TOKEN_TTL_SECS", _)));
    }
}
