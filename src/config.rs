//! Server configuration module
//! Loads the immutable runtime configuration once at process start

use crate::auth::password::HashCost;
use crate::constants::{DEFAULT_AUTH_MIN_RESPONSE_MS, DEFAULT_HOST, DEFAULT_PORT, MIN_SECRET_LENGTH};
use crate::error::{PortalError, Result};
use std::env;
use std::time::Duration;

/// Cross-origin policy for browser clients.
///
/// A wildcard origin never allows credentials; credentials are only
/// allowed together with an explicit origin list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AnyOrigin,
    AllowList(Vec<String>),
}

impl CorsPolicy {
    pub fn allows_credentials(&self) -> bool {
        matches!(self, CorsPolicy::AllowList(_))
    }
}

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    pub cors: CorsPolicy,
    /// Argon2 cost parameters for new password hashes
    pub hash_cost: HashCost,
    /// Floor applied to every login response
    pub auth_min_response: Duration,
    /// TLS configuration
    pub enable_tls: bool,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

impl ServerConfig {
    /// Fast configuration for tests. Never use in production.
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "unit-tests-only-signing-key-9f3a7c1e-b82d-4d60".to_string(),
            cors: CorsPolicy::AnyOrigin,
            hash_cost: HashCost::for_testing(),
            auth_min_response: Duration::ZERO,
            enable_tls: false,
            tls_cert_path: None,
            tls_key_path: None,
        }
    }

    /// Validate that a secret meets security requirements
    fn validate_secret(secret: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(PortalError::ConfigError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LENGTH
            )));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.to_lowercase().contains(pattern) {
                return Err(PortalError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PortalError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols)".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse `*` or a comma separated list of http(s) origins
    fn parse_cors(raw: Option<String>) -> Result<CorsPolicy> {
        let raw = match raw {
            Some(value) => value,
            None => return Ok(CorsPolicy::AnyOrigin),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(CorsPolicy::AnyOrigin);
        }

        let mut origins = Vec::new();
        for origin in trimmed.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            if origin == "*" {
                return Err(PortalError::ConfigError(
                    "Wildcard origin cannot be mixed with explicit origins".to_string(),
                ));
            }
            let parsed = url::Url::parse(origin).map_err(|e| {
                PortalError::ConfigError(format!("Invalid CORS origin '{}': {}", origin, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                return Err(PortalError::ConfigError(format!(
                    "CORS origin must be an http(s) origin: {}",
                    origin
                )));
            }
            if parsed.path() != "/" || parsed.query().is_some() {
                return Err(PortalError::ConfigError(format!(
                    "CORS origin must not contain a path or query: {}",
                    origin
                )));
            }
            origins.push(origin.trim_end_matches('/').to_string());
        }

        Ok(CorsPolicy::AllowList(origins))
    }

    fn parse_number<T: std::str::FromStr>(
        lookup: &impl Fn(&str) -> Option<String>,
        key: &str,
        default: T,
    ) -> Result<T> {
        match lookup(key) {
            Some(value) => value.trim().parse().map_err(|_| {
                PortalError::ConfigError(format!("{} must be a number, got '{}'", key, value))
            }),
            None => Ok(default),
        }
    }

    fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
        lookup(key)
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("PORTAL_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = Self::parse_number(&lookup, "PORTAL_PORT", DEFAULT_PORT)?;

        let jwt_secret = lookup("PORTAL_JWT_SECRET")
            .or_else(|| lookup("JWT_SECRET"))
            .ok_or_else(|| {
                PortalError::ConfigError(
                    "JWT_SECRET environment variable is required. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;
        Self::validate_secret(&jwt_secret)?;

        let cors = Self::parse_cors(lookup("PORTAL_CORS_ALLOWED_ORIGINS"))?;

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: Self::parse_number(&lookup, "PORTAL_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: Self::parse_number(&lookup, "PORTAL_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: Self::parse_number(&lookup, "PORTAL_HASH_PARALLELISM", defaults.parallelism)?,
        };
        hash_cost.validate()?;

        let min_response_ms = Self::parse_number(
            &lookup,
            "PORTAL_AUTH_MIN_RESPONSE_MS",
            DEFAULT_AUTH_MIN_RESPONSE_MS,
        )?;

        // TLS configuration
        let enable_tls = Self::parse_flag(&lookup, "PORTAL_ENABLE_TLS");
        let tls_cert_path = lookup("PORTAL_TLS_CERT_PATH");
        let tls_key_path = lookup("PORTAL_TLS_KEY_PATH");

        if enable_tls {
            match (&tls_cert_path, &tls_key_path) {
                (Some(cert_path), Some(key_path)) => {
                    if !std::path::Path::new(cert_path).exists() {
                        return Err(PortalError::ConfigError(format!(
                            "TLS certificate file does not exist: {}",
                            cert_path
                        )));
                    }
                    if !std::path::Path::new(key_path).exists() {
                        return Err(PortalError::ConfigError(format!(
                            "TLS private key file does not exist: {}",
                            key_path
                        )));
                    }
                }
                _ => {
                    return Err(PortalError::ConfigError(
                        "TLS is enabled but PORTAL_TLS_CERT_PATH or PORTAL_TLS_KEY_PATH is not set"
                            .to_string(),
                    ))
                }
            }
        }

        Ok(Self {
            host,
            port,
            jwt_secret,
            cors,
            hash_cost,
            auth_min_response: Duration::from_millis(min_response_ms),
            enable_tls,
            tls_cert_path,
            tls_key_path,
        })
    }
}
