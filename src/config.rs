//! Service configuration
//!
//! All knobs live on [`AppConfig`], loadable from environment variables or
//! built programmatically. The two credential secrets ship with development
//! defaults so the binary runs out of the box; [`crate::secret`] flags
//! them as weak at startup.

use std::time::Duration;

use crate::parse::{parse_duration, parse_size};

/// Header carrying the static administrator secret.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address for the HTTP server
    pub bind_addr: String,

    /// Symmetric secret used to sign and verify session tokens
    pub signing_secret: String,

    /// Static shared secret for the admin gate (`x-admin-token` header)
    pub admin_token: String,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Emit hardening response headers (nosniff, frame deny, CSP, no-store)
    pub security_headers_enabled: bool,

    /// Attach tower-http request tracing
    pub tracing_enabled: bool,

    /// Pre-load the sample user record at startup
    pub seed_sample_user: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            // Development placeholders. Both fail the strength policy on
            // purpose so startup logs a warning until they are replaced.
            signing_secret: "YOUR_SECRET_KEY".to_string(),
            admin_token: "ADMIN_TOKEN".to_string(),
            max_request_size: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            security_headers_enabled: true,
            tracing_enabled: true,
            seed_sample_user: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BIND_ADDR`: listen address (default: "127.0.0.1:3000")
    /// - `SIGNING_SECRET`: token signing secret
    /// - `ADMIN_TOKEN`: admin gate secret
    /// - `MAX_REQUEST_SIZE`: e.g. "1MB" (default: "1MB")
    /// - `REQUEST_TIMEOUT`: e.g. "30s" (default: "30s")
    /// - `SECURITY_HEADERS_ENABLED`: "true"/"false" (default: "true")
    /// - `TRACING_ENABLED`: "true"/"false" (default: "true")
    /// - `SEED_SAMPLE_USER`: "true"/"false" (default: "true")
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            signing_secret: std::env::var("SIGNING_SECRET").unwrap_or(defaults.signing_secret),
            admin_token: std::env::var("ADMIN_TOKEN").unwrap_or(defaults.admin_token),
            max_request_size: std::env::var("MAX_REQUEST_SIZE")
                .map(|s| parse_size(&s))
                .unwrap_or(defaults.max_request_size),
            request_timeout: std::env::var("REQUEST_TIMEOUT")
                .map(|s| parse_duration(&s))
                .unwrap_or(defaults.request_timeout),
            security_headers_enabled: env_flag("SECURITY_HEADERS_ENABLED", true),
            tracing_enabled: env_flag("TRACING_ENABLED", true),
            seed_sample_user: env_flag("SEED_SAMPLE_USER", true),
        }
    }

    /// Start a builder for programmatic configuration.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|s| s.to_lowercase() != "false")
        .unwrap_or(default)
}

/// Builder for [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    pub fn signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.signing_secret = secret.into();
        self
    }

    pub fn admin_token(mut self, token: impl Into<String>) -> Self {
        self.config.admin_token = token.into();
        self
    }

    pub fn max_request_size(mut self, bytes: usize) -> Self {
        self.config.max_request_size = bytes;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn disable_security_headers(mut self) -> Self {
        self.config.security_headers_enabled = false;
        self
    }

    pub fn disable_tracing(mut self) -> Self {
        self.config.tracing_enabled = false;
        self
    }

    pub fn seed_sample_user(mut self, seed: bool) -> Self {
        self.config.seed_sample_user = seed;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults_are_placeholders() {
        let config = AppConfig::default();
        assert_eq!(config.signing_secret, "YOUR_SECRET_KEY");
        assert_eq!(config.admin_token, "ADMIN_TOKEN");
        assert!(config.seed_sample_user);
    }

    #[test]
    fn builder_overrides() {
        let config = AppConfig::builder()
            .bind_addr("0.0.0.0:8080")
            .signing_secret("s1")
            .admin_token("s2")
            .max_request_size(2048)
            .request_timeout(Duration::from_secs(5))
            .disable_security_headers()
            .seed_sample_user(false)
            .build();

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.signing_secret, "s1");
        assert_eq!(config.admin_token, "s2");
        assert_eq!(config.max_request_size, 2048);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.security_headers_enabled);
        assert!(!config.seed_sample_user);
    }
}
