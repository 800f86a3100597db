use crate::error::{config_error, Error, SchedulerResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::str::FromStr;

/// Location of the optional component toggles file
pub const COMPONENTS_FILE: &str = "config/components.toml";

/// Longest accepted reminder lookahead: one year
pub const MAX_REMINDER_WINDOW_MINUTES: i64 = 366 * 24 * 60;

/// Which persistence backend holds the event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Memory,
    Redis,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(config_error(&format!("Unknown store backend: {}", other))),
        }
    }
}

/// Main configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Persistence backend for events
    pub store_backend: StoreBackend,
    /// Path of the JSON file used by the file backend
    pub data_file: String,
    /// Redis connection URL used by the redis backend
    pub redis_url: String,
    /// Seconds between reminder scans
    pub reminder_interval_secs: u64,
    /// Lookahead of the reminder due window, in minutes
    pub reminder_window_minutes: i64,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Default for Config {
    fn default() -> Self {
        let mut components = HashMap::new();
        components.insert("reminders".to_string(), true);

        Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            store_backend: StoreBackend::File,
            data_file: "events.json".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            reminder_interval_secs: 60,
            reminder_window_minutes: 60,
            components,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SchedulerResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parse_env("PORT", defaults.port)?;
        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.store_backend,
        };
        let data_file = env::var("DATA_FILE").unwrap_or(defaults.data_file);
        let redis_url = env::var("REDIS_URL").unwrap_or(defaults.redis_url);
        let reminder_interval_secs =
            parse_env("REMINDER_INTERVAL_SECS", defaults.reminder_interval_secs)?;
        let reminder_window_minutes =
            parse_env("REMINDER_WINDOW_MINUTES", defaults.reminder_window_minutes)?;

        let mut components = defaults.components;

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string(COMPONENTS_FILE) {
            let file_components = toml::from_str::<HashMap<String, bool>>(&content)?;
            // Merge with defaults
            for (key, value) in file_components {
                components.insert(key, value);
            }
        }

        if reminder_interval_secs == 0 {
            return Err(config_error("REMINDER_INTERVAL_SECS must be greater than zero"));
        }
        validate_reminder_window(reminder_window_minutes)?;

        Ok(Config {
            host,
            port,
            store_backend,
            data_file,
            redis_url,
            reminder_interval_secs,
            reminder_window_minutes,
            components,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }
}

/// Reject windows that are not positive or longer than a year
pub fn validate_reminder_window(minutes: i64) -> SchedulerResult<()> {
    if minutes <= 0 || minutes > MAX_REMINDER_WINDOW_MINUTES {
        return Err(config_error(&format!(
            "REMINDER_WINDOW_MINUTES must be between 1 and {}, got {}",
            MAX_REMINDER_WINDOW_MINUTES, minutes
        )));
    }
    Ok(())
}

fn parse_env<T: FromStr>(var: &str, default: T) -> SchedulerResult<T> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| Error::Environment(format!("Invalid {} format", var))),
        Err(_) => Ok(default),
    }
}
