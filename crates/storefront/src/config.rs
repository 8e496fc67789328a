//! Environment-driven configuration.
//!
//! Required variables:
//! - `STOREFRONT_BASE_URL` - public URL of the storefront
//! - `STOREFRONT_SESSION_SECRET` - session signing secret, min 32 chars
//! - `BACKEND_URL` - hosted backend base URL
//! - `BACKEND_SERVICE_KEY` - hosted backend service key (server-side only)
//!
//! Optional:
//! - `STOREFRONT_HOST` (default 127.0.0.1), `STOREFRONT_PORT` (default 3000)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`
//!
//! Secrets are rejected at startup when they look like placeholders or have
//! too little entropy; a storefront that boots with `changeme` in its
//! session secret is worse than one that refuses to boot.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings (lowercased) that mark a secret as a placeholder.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL; decides whether session cookies are marked secure.
    pub base_url: String,
    pub session_secret: SecretString,
    pub backend: BackendConfig,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Hosted backend (record store) connection settings.
///
/// `Debug` is implemented by hand so the service key never lands in logs.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL without a trailing slash.
    pub url: String,
    /// Service key with full table access. Server-side only.
    pub service_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from the environment, reading `.env` first when
    /// one is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for missing or unparseable variables, and for
    /// secrets that fail the placeholder or entropy checks.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = env_or("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env_or("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let session_secret = validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        Ok(Self {
            host,
            port,
            base_url: require_env("STOREFRONT_BASE_URL")?,
            session_secret,
            backend: BackendConfig::from_env()?,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = require_env("BACKEND_URL")?
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            url,
            service_key: validated_secret("BACKEND_SERVICE_KEY")?,
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = require_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Reject placeholders and low-entropy strings. Real keys and generated
/// secrets clear the entropy bar comfortably; `aaaa...` and friends do not.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // secrets are short
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entropy_of_degenerate_strings_is_zero() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn entropy_of_balanced_pair_is_one_bit() {
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn entropy_of_random_looking_string_clears_threshold() {
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn placeholder_secrets_are_rejected() {
        assert!(validate_secret_strength("your-api-key-here", "TEST_VAR").is_err());
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn low_entropy_secret_is_rejected() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn strong_secret_passes() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn session_secret_length_is_enforced() {
        let short = SecretString::from("short");
        assert!(validate_session_secret(&short, "TEST_SESSION").is_err());

        let long_enough = SecretString::from("a".repeat(32));
        assert!(validate_session_secret(&long_enough, "TEST_SESSION").is_ok());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            backend: BackendConfig {
                url: "https://backend.test".to_string(),
                service_key: SecretString::from("service_key"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn backend_debug_output_redacts_the_service_key() {
        let config = BackendConfig {
            url: "https://backend.test".to_string(),
            service_key: SecretString::from("super_secret_service_key"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://backend.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_service_key"));
    }
}
