//! Settings struct with TOML-based sections.
//!
//! Each section maps to one TOML table and can be rewritten on its own
//! through [`ConfigManager::update_section`](super::ConfigManager::update_section).

use serde::{Deserialize, Serialize};

use crate::cues::parser::ParserOptions;
use crate::cues::session::SessionSettings;
use crate::cues::sync::{round_tenths, SyncLimits, DEFAULT_MAX_OFFSET, DEFAULT_STEP};
use crate::cues::transcript::DEFAULT_CUE_WINDOW;
use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Offset limits and the persisted offset preference.
    #[serde(default)]
    pub sync: SyncSettings,

    /// Playback clock sampling.
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Parser switches.
    #[serde(default)]
    pub parser: ParserOptions,

    /// Live transcript cues.
    #[serde(default)]
    pub transcript: TranscriptSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Offset limits and preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Amount applied by one nudge, in seconds.
    #[serde(default = "default_step")]
    pub step_seconds: f64,

    /// Offset bound, in seconds.
    #[serde(default = "default_max_offset")]
    pub max_offset_seconds: f64,

    /// Offset applied when a payload is loaded.
    #[serde(default)]
    pub offset_seconds: f64,
}

fn default_step() -> f64 {
    DEFAULT_STEP
}

fn default_max_offset() -> f64 {
    DEFAULT_MAX_OFFSET
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            step_seconds: default_step(),
            max_offset_seconds: default_max_offset(),
            offset_seconds: 0.0,
        }
    }
}

/// Playback clock sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Interval between clock samples, in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval() -> u64 {
    250
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
        }
    }
}

/// Live transcript cue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSettings {
    /// How long a transcript cue stays on screen, in seconds.
    #[serde(default = "default_cue_window")]
    pub cue_window_seconds: f64,
}

fn default_cue_window() -> f64 {
    DEFAULT_CUE_WINDOW
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            cue_window_seconds: default_cue_window(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Include the event target (module path) in log lines.
    #[serde(default = "default_true")]
    pub show_target: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            show_target: true,
        }
    }
}

impl Settings {
    /// Bring out-of-range values back into range.
    ///
    /// Returns one message per corrected field; an empty list means the
    /// settings were already valid.
    pub fn validate(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();
        let sync = &mut self.sync;

        if !(sync.step_seconds.is_finite() && sync.step_seconds > 0.0) {
            fixes.push(format!(
                "sync.step_seconds {} reset to {}",
                sync.step_seconds, DEFAULT_STEP
            ));
            sync.step_seconds = DEFAULT_STEP;
        }

        if !(sync.max_offset_seconds.is_finite() && sync.max_offset_seconds >= 0.0) {
            fixes.push(format!(
                "sync.max_offset_seconds {} reset to {}",
                sync.max_offset_seconds, DEFAULT_MAX_OFFSET
            ));
            sync.max_offset_seconds = DEFAULT_MAX_OFFSET;
        } else if sync.max_offset_seconds > DEFAULT_MAX_OFFSET {
            fixes.push(format!(
                "sync.max_offset_seconds {} clamped to {}",
                sync.max_offset_seconds, DEFAULT_MAX_OFFSET
            ));
            sync.max_offset_seconds = DEFAULT_MAX_OFFSET;
        }

        let offset = if self.sync.offset_seconds.is_finite() {
            self.sync_limits().normalize(self.sync.offset_seconds)
        } else {
            0.0
        };
        if offset != self.sync.offset_seconds {
            fixes.push(format!(
                "sync.offset_seconds {} adjusted to {}",
                self.sync.offset_seconds, offset
            ));
            self.sync.offset_seconds = offset;
        }

        if self.playback.tick_interval_ms == 0 {
            fixes.push(format!(
                "playback.tick_interval_ms 0 reset to {}",
                default_tick_interval()
            ));
            self.playback.tick_interval_ms = default_tick_interval();
        }

        let window = self.transcript.cue_window_seconds;
        if !(window.is_finite() && window > 0.0) {
            fixes.push(format!(
                "transcript.cue_window_seconds {} reset to {}",
                window, DEFAULT_CUE_WINDOW
            ));
            self.transcript.cue_window_seconds = DEFAULT_CUE_WINDOW;
        }

        fixes
    }

    /// Offset limits for a [`SyncController`](crate::cues::SyncController).
    pub fn sync_limits(&self) -> SyncLimits {
        SyncLimits {
            max_offset: round_tenths(self.sync.max_offset_seconds),
            step: self.sync.step_seconds,
        }
    }

    /// Tunables for a [`CueSession`](crate::cues::CueSession).
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            limits: self.sync_limits(),
            parser: self.parser.clone(),
            cue_window_seconds: self.transcript.cue_window_seconds,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Sync,
    Playback,
    Parser,
    Transcript,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Sync,
        ConfigSection::Playback,
        ConfigSection::Parser,
        ConfigSection::Transcript,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Sync => "sync",
            ConfigSection::Playback => "playback",
            ConfigSection::Parser => "parser",
            ConfigSection::Transcript => "transcript",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the table in a generated file.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Sync => "Subtitle offset limits and the saved offset (seconds)",
            ConfigSection::Playback => "Playback clock sampling",
            ConfigSection::Parser => "Subtitle parser switches",
            ConfigSection::Transcript => "Live transcript cues",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
