//! Configuration management for pipsub.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use pipsub_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/pipsub.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Saved offset: {}", config.settings().sync.offset_seconds);
//!
//! config.settings_mut().sync.offset_seconds = 1.5;
//! config.update_section(ConfigSection::Sync).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, PlaybackSettings, Settings, SyncSettings, TranscriptSettings,
};
