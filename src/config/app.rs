//! Main application configuration
//!
//! Defines the configuration structures of the league service, environment
//! variable loading, TOML file loading and validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub league: LeagueSettings,
    pub notifications: NotificationSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// League read-model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSettings {
    /// Number of teams in the top-teams view and rows in leaderboards
    pub top_teams_limit: usize,
    /// JSON snapshot loaded at startup and written on shutdown
    pub snapshot_path: Option<PathBuf>,
}

/// Notification delivery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Deliver notifications to the in-app inbox
    pub enabled: bool,
    /// Capacity of the queue between emitters and the dispatcher
    pub queue_capacity: usize,
    /// Notifications kept per recipient; older ones are evicted
    pub inbox_limit: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "futsal-league".to_string(),
            log_level: "info".to_string(),
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            top_teams_limit: 5,
            snapshot_path: None,
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: 1024,
            inbox_limit: crate::notify::inbox::DEFAULT_INBOX_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // League settings
        if let Ok(limit) = env::var("TOP_TEAMS_LIMIT") {
            config.league.top_teams_limit = limit
                .parse()
                .map_err(|_| anyhow!("Invalid TOP_TEAMS_LIMIT value: {}", limit))?;
        }
        if let Ok(path) = env::var("SNAPSHOT_PATH") {
            config.league.snapshot_path = (!path.is_empty()).then(|| PathBuf::from(path));
        }

        // Notification settings
        if let Ok(enabled) = env::var("NOTIFICATIONS_ENABLED") {
            config.notifications.enabled = enabled
                .parse()
                .map_err(|_| anyhow!("Invalid NOTIFICATIONS_ENABLED value: {}", enabled))?;
        }
        if let Ok(capacity) = env::var("NOTIFICATION_QUEUE_CAPACITY") {
            config.notifications.queue_capacity = capacity
                .parse()
                .map_err(|_| anyhow!("Invalid NOTIFICATION_QUEUE_CAPACITY value: {}", capacity))?;
        }
        if let Ok(limit) = env::var("INBOX_LIMIT") {
            config.notifications.inbox_limit = limit
                .parse()
                .map_err(|_| anyhow!("Invalid INBOX_LIMIT value: {}", limit))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.trim().is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.league.top_teams_limit == 0 {
        return Err(anyhow!("Top teams limit must be greater than 0"));
    }
    if config.notifications.queue_capacity == 0 {
        return Err(anyhow!("Notification queue capacity must be greater than 0"));
    }
    if config.notifications.inbox_limit == 0 {
        return Err(anyhow!("Inbox limit must be greater than 0"));
    }

    Ok(())
}
