//! Configuration management for the Garden Tracker server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with GARDEN__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::schedule::FrostDates;
use shared::GardenResult;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Gardening defaults: frost dates and dashboard thresholds
    pub garden: GardenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GardenConfig {
    /// Average last spring frost as MM-DD
    pub last_frost_date: String,

    /// Average first fall frost as MM-DD
    pub first_frost_date: String,

    /// Days covered by the upcoming tasks list
    pub upcoming_window_days: u32,

    /// Seed lots at or below this quantity are flagged on the dashboard
    pub low_seed_threshold: i32,

    /// Container volume used when a plan or capacity query does not give one
    pub default_container_volume: i32,
}

impl GardenConfig {
    pub fn frost_dates(&self) -> GardenResult<FrostDates> {
        FrostDates::parse(&self.last_frost_date, &self.first_frost_date)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("GARDEN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 86400)?
            .set_default("garden.last_frost_date", "04-15")?
            .set_default("garden.first_frost_date", "10-15")?
            .set_default("garden.upcoming_window_days", 14)?
            .set_default("garden.low_seed_threshold", 10)?
            .set_default("garden.default_container_volume", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GARDEN_ prefix)
            .add_source(
                Environment::with_prefix("GARDEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;

        // Frost dates must resolve before any calendar request
        config
            .garden
            .frost_dates()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(config)
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
