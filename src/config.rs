use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_LIGHTNING_API_URL: &str = "https://api-open.data.gov.sg/v2/real-time/api/weather";
pub const DEFAULT_GEOCODE_API_URL: &str = "https://developers.onemap.sg/commonapi/search";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got '{value}'")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub lightning_api_url: String,
    pub geocode_api_url: String,
    pub http_timeout_secs: u64,
    pub batch_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            lightning_api_url: url_var("LIGHTNING_API_URL", DEFAULT_LIGHTNING_API_URL)?,
            geocode_api_url: url_var("GEOCODE_API_URL", DEFAULT_GEOCODE_API_URL)?,
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            batch_delay_ms: env::var("BATCH_DELAY_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

fn url_var(var: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = env::var(var).unwrap_or_else(|_| default.to_string());
    validate_url(var, value)
}

fn validate_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl { var, value })
    }
}
