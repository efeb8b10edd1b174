//! Configuration management for the Reagent Inventory Tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with INVENTORY_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::alerts::AlertThresholds;

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Dashboard risk alert limits
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
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite:inventory.db`
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// Lots expiring within this many days raise an alert
    pub expiring_soon_days: i64,

    /// Counts strictly below this raise a low-stock alert
    pub low_stock_threshold: i64,

    /// Sites not counted for longer than this raise an alert
    pub stale_inventory_days: i64,
}

impl AlertConfig {
    /// Alert limits for the dashboard; every limit must be non-negative
    pub fn thresholds(&self) -> AppResult<AlertThresholds> {
        let limits = [
            ("alerts.expiring_soon_days", self.expiring_soon_days),
            ("alerts.low_stock_threshold", self.low_stock_threshold),
            ("alerts.stale_inventory_days", self.stale_inventory_days),
        ];
        if let Some((key, value)) = limits.iter().find(|(_, value)| *value < 0) {
            return Err(AppError::Configuration(format!(
                "{} must not be negative (got {})",
                key, value
            )));
        }

        Ok(AlertThresholds {
            expiring_soon_days: self.expiring_soon_days,
            low_stock_threshold: self.low_stock_threshold,
            stale_inventory_days: self.stale_inventory_days,
        })
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("INVENTORY_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let alert_defaults = AlertThresholds::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "sqlite:inventory.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("alerts.expiring_soon_days", alert_defaults.expiring_soon_days)?
            .set_default("alerts.low_stock_threshold", alert_defaults.low_stock_threshold)?
            .set_default("alerts.stale_inventory_days", alert_defaults.stale_inventory_days)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (INVENTORY_ prefix)
            .add_source(
                Environment::with_prefix("INVENTORY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
