//! Configuration management for the Agricultural Weather Station Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGW_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Telemetry channel configuration
    pub station: StationConfig,

    /// Archived-data repository configuration
    pub archive: ArchiveConfig,

    /// Telegram notification configuration
    pub telegram: TelegramConfig,

    /// Alert evaluation defaults
    pub alerts: AlertConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StationConfig {
    /// Telemetry API base URL
    pub base_url: String,

    /// Telemetry channel identifier
    pub channel_id: u64,

    /// Read API key; empty for public channels
    pub read_api_key: String,

    /// IANA timezone the station reports in locally
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    /// Base URL of the monthly CSV archive
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Bot token; empty disables notifications
    pub bot_token: String,

    /// Chat the bot posts alerts to
    pub chat_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// Default sustained-rain threshold in minutes
    pub rain_threshold_minutes: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("AGW_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("station.base_url", "https://api.thingspeak.com")?
            .set_default("station.channel_id", 2328695)?
            .set_default("station.read_api_key", "")?
            .set_default("station.timezone", "Asia/Seoul")?
            .set_default(
                "archive.base_url",
                "https://raw.githubusercontent.com/EthanSeok/JBNU_AWS/main/output",
            )?
            .set_default("telegram.bot_token", "")?
            .set_default("telegram.chat_id", "")?
            .set_default("alerts.rain_threshold_minutes", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGW_ prefix)
            .add_source(
                Environment::with_prefix("AGW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
