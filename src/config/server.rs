//! HTTP listener and logging settings

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Longest request timeout accepted by validation.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Listener address, request timeout and log output for the webhook service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind to. Hostnames are rejected.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// `pretty` for local runs, `json` for log shippers
    #[serde(default)]
    pub log_format: LogFormat,

    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ValidationError::InvalidBindAddress(addr))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn uses_json_logs(&self) -> bool {
        self.log_format == LogFormat::Json
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,rentio=debug,tower_http=info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_with_pretty_logs() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.uses_json_logs());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn json_format_switches_log_output() {
        let config = ServerConfig {
            log_format: LogFormat::Json,
            ..Default::default()
        };
        assert!(config.uses_json_logs());
    }

    #[test]
    fn socket_addr_joins_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn socket_addr_rejects_hostname() {
        let config = ServerConfig {
            host: "not an ip".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.socket_addr(),
            Err(ValidationError::InvalidBindAddress(_))
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn validation_bounds_request_timeout() {
        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }

        let config = ServerConfig {
            request_timeout_secs: MAX_REQUEST_TIMEOUT_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
