//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHINE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JWT_SECRET` - Access token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `SHINE_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 5000)
//! - `EXPIRES_IN` - Access token lifetime, e.g. `90m`, `12h`, `7d`; a bare number is milliseconds (default: 1d)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated browser origins (default: `http://localhost:3000`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_TOKEN_TTL: &str = "1d";

/// Blocklist of common placeholder patterns (case-insensitive)
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

/// Configuration errors that can occur during loading.
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
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Access token settings
    pub token: TokenConfig,
    /// Browser origins allowed by CORS
    pub cors_allowed_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Access token signing configuration.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret
    pub secret: SecretString,
    /// Lifetime of issued tokens
    pub ttl: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHINE_DATABASE_URL")?;
        let host = get_env_or_default("SHINE_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHINE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let token = TokenConfig::from_env()?;

        let cors_allowed_origins =
            parse_origins(&get_env_or_default("CORS_ALLOWED_ORIGINS", "http://localhost:3000"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            token,
            cors_allowed_origins,
            sentry_dsn,
            sentry_environment,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl TokenConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = get_validated_secret("JWT_SECRET")?;
        validate_secret_length(&secret, "JWT_SECRET")?;

        let raw_ttl = get_env_or_default("EXPIRES_IN", DEFAULT_TOKEN_TTL);
        let ttl = parse_ttl(&raw_ttl)
            .ok_or_else(|| ConfigError::InvalidEnvVar("EXPIRES_IN".to_string(), raw_ttl.clone()))?;

        Ok(Self { secret, ttl })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a token lifetime.
///
/// A bare number is a count of milliseconds. Otherwise a number followed by a
/// unit (`ms`, `s`, `m`, `h`, `d`, `w`, `y`, or their long forms such as
/// `minutes` or `days`), optionally separated by whitespace, case-insensitive.
fn parse_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    let value: f64 = number.parse().ok()?;

    let millis_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1_000.0,
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000.0,
        "d" | "day" | "days" => 86_400_000.0,
        "w" | "week" | "weeks" => 604_800_000.0,
        "y" | "yr" | "yrs" | "year" | "years" => 31_557_600_000.0,
        _ => return None,
    };

    Duration::try_from_secs_f64(value * millis_per_unit / 1_000.0)
        .ok()
        .filter(|ttl| !ttl.is_zero())
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
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

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-jwt-key-here", "JWT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(40), "JWT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "JWT_SECRET");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_secret_length() {
        assert!(validate_secret_length(&SecretString::from("short"), "JWT_SECRET").is_err());
        assert!(validate_secret_length(&SecretString::from("k".repeat(32)), "JWT_SECRET").is_ok());
    }

    #[test]
    fn test_parse_ttl_bare_number_is_milliseconds() {
        assert_eq!(parse_ttl("1500"), Some(Duration::from_millis(1_500)));
        assert_eq!(parse_ttl("86400000"), Some(Duration::from_secs(86_400)));
    }

    #[test]
    fn test_parse_ttl_units() {
        assert_eq!(parse_ttl("90m"), Some(Duration::from_secs(5_400)));
        assert_eq!(parse_ttl("12h"), Some(Duration::from_secs(43_200)));
        assert_eq!(parse_ttl("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_ttl("2 days"), Some(Duration::from_secs(172_800)));
        assert_eq!(parse_ttl("1.5H"), Some(Duration::from_secs(5_400)));
        assert_eq!(parse_ttl("1w"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_ttl("1500ms"), Some(Duration::from_millis(1_500)));
    }

    #[test]
    fn test_parse_ttl_rejects_garbage() {
        assert_eq!(parse_ttl(""), None);
        assert_eq!(parse_ttl("soon"), None);
        assert_eq!(parse_ttl("10 fortnights"), None);
        assert_eq!(parse_ttl("-5m"), None);
        assert_eq!(parse_ttl("0"), None);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:3000/, https://shop.test ,,"),
            vec!["http://localhost:3000", "https://shop.test"]
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            token: TokenConfig {
                secret: SecretString::from("k".repeat(32)),
                ttl: Duration::from_secs(60),
            },
            cors_allowed_origins: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_token_config_debug_redacts_secret() {
        let config = TokenConfig {
            secret: SecretString::from("super_sensitive_signing_key_value"),
            ttl: Duration::from_secs(60),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_sensitive_signing_key_value"));
    }
}
