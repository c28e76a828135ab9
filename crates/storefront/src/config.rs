//! Storefront configuration loaded from environment variables.
//!
//! Every variable is optional; the defaults describe a local development
//! server for the Takshashil Foundation.
//!
//! # Environment Variables
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_RATE_LIMIT` - Rate limit form submissions (default: true)
//!
//! ## Shop
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 999)
//! - `STOREFRONT_FLAT_SHIPPING_FEE` - Shipping fee otherwise (default: 50)
//! - `STOREFRONT_ORDER_RESET_MS` - Delay before a completed order resets (default: 5000)
//! - `STOREFRONT_SIMULATED_LATENCY_MS` - Fake processing delay for forms (default: 1500)
//! - `STOREFRONT_DOWNLOAD_TTL_SECS` - Lifetime of unclaimed downloads (default: 600)
//!
//! ## Organization
//! - `ORG_NAME`, `ORG_EMAIL`, `ORG_PHONE`, `ORG_WEBSITE` - Letterhead details
//! - `CONTACT_RECIPIENT` - Where contact messages would be delivered (default: `ORG_EMAIL`)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use takshashil_core::{Price, PricingPolicy};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Shipping rules for both shops
    pub pricing: PricingPolicy,
    /// How long the order-complete screen stays before the cart resets
    pub order_reset: Duration,
    /// Fake latency for donation and contact submissions
    pub simulated_latency: Duration,
    /// How long an unclaimed certificate download stays available
    pub download_ttl: Duration,
    /// Whether POST endpoints are rate limited
    pub rate_limit_enabled: bool,
    /// Letterhead and footer details
    pub organization: OrganizationConfig,
    /// Recipient logged for contact form submissions
    pub contact_recipient: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Organization details printed on pages and generated documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationConfig {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub tagline: String,
    /// Prefix of certificate IDs, e.g. `TF` in `TF-0042`
    pub certificate_prefix: String,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            name: "Takshashil Foundation".to_string(),
            email: "contact@takshashil.org".to_string(),
            phone: "+91 9876543210".to_string(),
            website: "www.takshashil.org".to_string(),
            tagline: "Empowering Communities Through Education".to_string(),
            certificate_prefix: "TF".to_string(),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let organization = OrganizationConfig::default();
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            pricing: PricingPolicy::default(),
            order_reset: Duration::from_millis(5000),
            simulated_latency: Duration::from_millis(1500),
            download_ttl: Duration::from_secs(600),
            rate_limit_enabled: true,
            contact_recipient: organization.email.clone(),
            organization,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but invalid.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let defaults = Self::default();
        let org_defaults = OrganizationConfig::default();

        let organization = OrganizationConfig {
            name: env.string_or("ORG_NAME", &org_defaults.name),
            email: env.string_or("ORG_EMAIL", &org_defaults.email),
            phone: env.string_or("ORG_PHONE", &org_defaults.phone),
            website: env.string_or("ORG_WEBSITE", &org_defaults.website),
            ..org_defaults
        };

        let base_url = env.string_or("STOREFRONT_BASE_URL", &defaults.base_url);
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            host: env.parsed_or("STOREFRONT_HOST", defaults.host)?,
            port: env.parsed_or("STOREFRONT_PORT", defaults.port)?,
            base_url,
            pricing: PricingPolicy {
                free_shipping_threshold: Price::new(env.parsed_or(
                    "STOREFRONT_FREE_SHIPPING_THRESHOLD",
                    defaults.pricing.free_shipping_threshold.amount(),
                )?),
                flat_shipping_fee: Price::new(env.parsed_or(
                    "STOREFRONT_FLAT_SHIPPING_FEE",
                    defaults.pricing.flat_shipping_fee.amount(),
                )?),
            },
            order_reset: Duration::from_millis(env.parsed_or("STOREFRONT_ORDER_RESET_MS", 5000)?),
            simulated_latency: Duration::from_millis(
                env.parsed_or("STOREFRONT_SIMULATED_LATENCY_MS", 1500)?,
            ),
            download_ttl: Duration::from_secs(env.parsed_or("STOREFRONT_DOWNLOAD_TTL_SECS", 600)?),
            rate_limit_enabled: env.parsed_or("STOREFRONT_RATE_LIMIT", true)?,
            contact_recipient: env.string_or("CONTACT_RECIPIENT", &organization.email),
            organization,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed_or("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: env
                .parsed_or("SENTRY_TRACES_SAMPLE_RATE", defaults.sentry_traces_sample_rate)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        }
    }
}
