//! Core cue types.
//!
//! All timing values are `f64` seconds. Rounding to milliseconds happens only
//! when a timestamp is formatted for display or export.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use super::error::CueError;

/// Timed-text dialects the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CueFormat {
    /// SubRip (.srt): index line, `,` fractional separator.
    #[default]
    Srt,
    /// WebVTT (.vtt): `WEBVTT` header, `.` fractional separator.
    WebVtt,
}

impl CueFormat {
    /// Detect format from file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::WebVtt),
            _ => None,
        }
    }

    /// Detect format from payload content.
    ///
    /// A payload whose first non-blank line starts with `WEBVTT` is WebVTT,
    /// everything else is treated as SubRip.
    pub fn detect(payload: &str) -> Self {
        let first = payload
            .trim_start_matches('\u{feff}')
            .lines()
            .find(|line| !line.trim().is_empty());
        match first {
            Some(line) if line.trim_start().starts_with("WEBVTT") => Self::WebVtt,
            _ => Self::Srt,
        }
    }

    /// Typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::WebVtt => "vtt",
        }
    }

    /// Fractional-second separator used when formatting timestamps.
    pub fn fraction_separator(&self) -> char {
        match self {
            Self::Srt => ',',
            Self::WebVtt => '.',
        }
    }
}

impl fmt::Display for CueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Srt => f.write_str("srt"),
            Self::WebVtt => f.write_str("vtt"),
        }
    }
}

impl FromStr for CueFormat {
    type Err = CueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "srt" | "subrip" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::WebVtt),
            other => Err(CueError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A single timed caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, always greater than `start` for parsed cues.
    pub end: f64,
    /// Display lines with markup stripped.
    pub lines: Vec<String>,
}

impl Cue {
    /// Create a cue from its interval and display lines.
    pub fn new<I, S>(start: f64, end: f64, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start,
            end,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Display text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` falls inside `[start, end]`.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    /// Shift this cue by an offset in seconds.
    pub fn shift(&mut self, delta: f64) {
        self.start += delta;
        self.end += delta;
    }
}

/// Identity of a cue inside a store.
///
/// Identities are unique across every load of the same store, so a reloaded
/// payload never reuses the id of a cue from the previous payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CueId(pub u64);

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cue resolved from the store together with its identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveCue {
    pub id: CueId,
    #[serde(flatten)]
    pub cue: Cue,
}

impl ActiveCue {
    /// Display text of the underlying cue.
    pub fn text(&self) -> String {
        self.cue.text()
    }
}
