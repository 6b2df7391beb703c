//! Environment configuration

use crate::error::AnalyticsError;
use crate::Result;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATASET_PATH: &str = "data/data_smire_final.json";
pub const DEFAULT_HOME_PAGE_PATH: &str = "static/index.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON array of merchant records, loaded once at startup
    pub dataset_path: PathBuf,
    /// HTML template served at `/`
    pub home_page_path: PathBuf,
    /// Substituted for `{{CHAT_WEBHOOK_URL}}` in the home page
    pub chat_webhook_url: String,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .unwrap_or_else(|_| "8080".to_string());
        let port = port.trim().parse().map_err(|e| {
            AnalyticsError::ConfigError(format!(
                "PORT must be a port number, got '{}': {}",
                port, e
            ))
        })?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            dataset_path: PathBuf::from(
                env::var("DATASET_PATH").unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string()),
            ),
            home_page_path: PathBuf::from(
                env::var("HOME_PAGE_PATH").unwrap_or_else(|_| DEFAULT_HOME_PAGE_PATH.to_string()),
            ),
            chat_webhook_url: env::var("CHAT_WEBHOOK_URL").unwrap_or_default(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
