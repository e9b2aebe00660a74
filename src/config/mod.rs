//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RENTIO_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use rentio::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod payment;
mod server;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Yoco webhooks)
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RENTIO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RENTIO__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RENTIO__PAYMENT__YOCO_WEBHOOK_SECRET=whsec_...` -> `payment.yoco_webhook_secret`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RENTIO")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const TEST_SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

    fn set_minimal_env() {
        env::set_var("RENTIO__PAYMENT__YOCO_WEBHOOK_SECRET", TEST_SECRET);
    }

    fn clear_env() {
        env::remove_var("RENTIO__PAYMENT__YOCO_WEBHOOK_SECRET");
        env::remove_var("RENTIO__PAYMENT__WEBHOOK_TOLERANCE_SECS");
        env::remove_var("RENTIO__PAYMENT__LINE_ENDING_FALLBACK");
        env::remove_var("RENTIO__SERVER__PORT");
        env::remove_var("RENTIO__SERVER__LOG_FORMAT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.payment.webhook_tolerance_secs, 180);
        assert!(config.payment.line_ending_fallback);
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load_validated();
        clear_env();

        assert!(result.is_ok(), "Invalid config: {:?}", result.err());
    }

    #[test]
    fn test_missing_webhook_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_json_log_format_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("RENTIO__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.server.uses_json_logs());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("RENTIO__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_tolerance_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("RENTIO__PAYMENT__WEBHOOK_TOLERANCE_SECS", "0");
        let result = AppConfig::load_validated();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(
                ValidationError::InvalidWebhookTolerance
            ))
        ));
    }
}
