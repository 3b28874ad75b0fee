//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `PLATFORM_DOMAIN_SUFFIX` - The platform's own deployment domain; hosts under it
//!   never trigger a custom domain lookup (default: vercel.app)
//! - `VERCEL_API_TOKEN` - Vercel API bearer token
//! - `VERCEL_PROJECT_ID` - Vercel project that custom domains are attached to
//! - `VERCEL_API_BASE_URL` - Vercel API endpoint (default: <https://api.vercel.com/v1>)
//! - `VERCEL_TIMEOUT_SECS` - Upper bound on a Vercel API call (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! The Vercel token and project ID are only needed to fetch DNS configuration
//! from Vercel. The server starts without them; a fetch then fails with a
//! configuration error.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default Vercel REST endpoint.
pub const DEFAULT_VERCEL_API_BASE_URL: &str = "https://api.vercel.com/v1";

/// Default platform deployment domain.
pub const DEFAULT_PLATFORM_DOMAIN_SUFFIX: &str = "vercel.app";

const DEFAULT_VERCEL_TIMEOUT_SECS: u64 = 10;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Deployment domain suffix excluded from custom domain resolution
    pub platform_domain_suffix: String,
    /// Vercel domain API configuration
    pub vercel: VercelConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Vercel domain API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct VercelConfig {
    /// API bearer token
    pub api_token: Option<SecretString>,
    /// Project the custom domains are attached to
    pub project_id: Option<String>,
    /// API endpoint, without trailing slash
    pub api_base_url: String,
    /// Upper bound on a single API call
    pub timeout: Duration,
}

impl std::fmt::Debug for VercelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VercelConfig")
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("project_id", &self.project_id)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for VercelConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            project_id: None,
            api_base_url: DEFAULT_VERCEL_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_VERCEL_TIMEOUT_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Configuration with every optional setting at its default.
    #[must_use]
    pub fn new(database_url: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            database_url,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: base_url.into(),
            platform_domain_suffix: DEFAULT_PLATFORM_DOMAIN_SUFFIX.to_string(),
            vercel: VercelConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the Vercel token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = database_url_from_env()?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            platform_domain_suffix: platform_domain_suffix_from_env(),
            vercel: VercelConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl VercelConfig {
    /// Load the Vercel settings from environment variables.
    ///
    /// Missing token or project ID is not an error here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL or timeout is malformed, or the
    /// token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = get_optional_env("VERCEL_API_TOKEN")
            .filter(|token| !token.is_empty())
            .map(|token| {
                validate_secret_strength(&token, "VERCEL_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        let api_base_url = get_env_or_default("VERCEL_API_BASE_URL", DEFAULT_VERCEL_API_BASE_URL);
        url::Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("VERCEL_API_BASE_URL".to_string(), e.to_string())
        })?;

        let timeout_secs = get_env_or_default(
            "VERCEL_TIMEOUT_SECS",
            &DEFAULT_VERCEL_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("VERCEL_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_token,
            project_id: get_optional_env("VERCEL_PROJECT_ID").filter(|id| !id.is_empty()),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Database URL with fallback to generic `DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither variable is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    get_database_url("STOREFRONT_DATABASE_URL")
}

/// Platform deployment domain suffix, defaulting to `vercel.app`.
#[must_use]
pub fn platform_domain_suffix_from_env() -> String {
    get_env_or_default("PLATFORM_DOMAIN_SUFFIX", DEFAULT_PLATFORM_DOMAIN_SUFFIX)
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
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token Vercel generated."
            ),
        ));
    }

    Ok(())
}
