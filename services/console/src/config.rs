//! services/console/src/config.rs
//!
//! Defines the console's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use tracing::Level;
use wonderpay_core::domain::Address;
use wonderpay_core::{Credentials, OrganizationProfile, RetryPolicy, MAX_RETRIES, RETRY_DELAY};

/// How long a finished document job stays queryable.
const DEFAULT_JOB_RETENTION: Duration = Duration::from_secs(300);

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    pub monite_api_url: String,
    pub monite_api_version: String,
    pub monite_client_id: String,
    pub monite_client_secret: String,
    pub ocr_max_retries: u32,
    pub ocr_retry_delay: Duration,
    pub job_retention: Duration,
    pub entity_profile: OrganizationProfile,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    ///
    /// Missing Monite credentials are not an error here: the console starts
    /// anyway and reports the problem through its session state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = var("CORS_ORIGIN", "http://localhost:5173");
        HeaderValue::from_str(&cors_origin)
            .map_err(|e| ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string()))?;

        // --- Platform Settings ---
        let monite_api_url = var("MONITE_API_URL", "https://api.sandbox.monite.com/v1");
        let monite_api_version = var("MONITE_API_VERSION", "2024-01-31");
        let monite_client_id = var("MONITE_CLIENT_ID", "");
        let monite_client_secret = var("MONITE_CLIENT_SECRET", "");

        // --- OCR Polling ---
        let ocr_max_retries = match lookup("OCR_MAX_RETRIES") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("OCR_MAX_RETRIES".to_string(), e.to_string())
            })?,
            None => MAX_RETRIES,
        };
        let ocr_retry_delay = match lookup("OCR_RETRY_DELAY_MS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_millis).map_err(|e| {
                ConfigError::InvalidValue("OCR_RETRY_DELAY_MS".to_string(), e.to_string())
            })?,
            None => RETRY_DELAY,
        };
        let job_retention = match lookup("JOB_RETENTION_SECS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                ConfigError::InvalidValue("JOB_RETENTION_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_JOB_RETENTION,
        };

        // --- Entity Created On First Run ---
        let defaults = OrganizationProfile::default();
        let field = |key: &str, fallback: String| lookup(key).unwrap_or(fallback);
        let entity_profile = OrganizationProfile {
            legal_name: field("ENTITY_LEGAL_NAME", defaults.legal_name),
            legal_type: field("ENTITY_LEGAL_TYPE", defaults.legal_type),
            tax_id: field("ENTITY_TAX_ID", defaults.tax_id),
            address: Address {
                country: field("ENTITY_COUNTRY", defaults.address.country),
                city: field("ENTITY_CITY", defaults.address.city),
                line1: field("ENTITY_LINE1", defaults.address.line1),
                postal_code: field("ENTITY_POSTAL_CODE", defaults.address.postal_code),
                state: field("ENTITY_STATE", defaults.address.state),
            },
            email: field("ENTITY_EMAIL", defaults.email),
            phone: field("ENTITY_PHONE", defaults.phone),
        };

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            monite_api_url,
            monite_api_version,
            monite_client_id,
            monite_client_secret,
            ocr_max_retries,
            ocr_retry_delay,
            job_retention,
            entity_profile,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.monite_client_id.clone(),
            self.monite_client_secret.clone(),
            self.monite_api_url.clone(),
            self.monite_api_version.clone(),
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.ocr_max_retries,
            delay: self.ocr_retry_delay,
        }
    }
}
