//! Configuration management for the futsal league engine
//!
//! Configuration comes from a TOML file or environment variables, falls back
//! to defaults and is validated before use.

pub mod app;

pub use app::{validate_config, AppConfig, LeagueSettings, NotificationSettings, ServiceSettings};
