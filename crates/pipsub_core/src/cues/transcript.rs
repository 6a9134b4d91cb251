//! Live transcript cues.
//!
//! Speech recognition results become a single cue anchored at the playback
//! time the utterance was recognized. The same cue can be rendered as a
//! one-block WebVTT payload for hosts that exchange text.

use serde::{Deserialize, Serialize};

use super::time_codec::format_timestamp;
use super::types::{Cue, CueFormat};

/// Default on-screen window for a transcript cue, in seconds.
pub const DEFAULT_CUE_WINDOW: f64 = 10.0;

/// One recognized utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptCue {
    pub text: String,
    /// Playback time the cue starts at.
    pub anchor_seconds: f64,
}

impl TranscriptCue {
    pub fn new(text: impl Into<String>, anchor_seconds: f64) -> Self {
        Self {
            text: text.into(),
            anchor_seconds,
        }
    }

    /// Non-blank display lines, trimmed.
    fn display_lines(&self) -> Vec<&str> {
        self.text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Start time, clamped to the playback range.
    fn start(&self) -> f64 {
        if self.anchor_seconds.is_finite() {
            self.anchor_seconds.max(0.0)
        } else {
            0.0
        }
    }

    /// Build the cue covering `[anchor, anchor + window]`.
    ///
    /// The text is taken verbatim, so an utterance such as "42" stays a
    /// caption. Returns `None` for blank text or a non-positive window.
    pub fn to_cue(&self, window_seconds: f64) -> Option<Cue> {
        let lines = self.display_lines();
        if lines.is_empty() || !(window_seconds > 0.0) {
            return None;
        }

        let start = self.start();
        Some(Cue::new(start, start + window_seconds, lines))
    }

    /// Render as a WebVTT payload covering `[anchor, anchor + window]`.
    ///
    /// Blank lines inside the utterance are dropped so the cue stays one
    /// block. Returns `None` for blank text or a non-positive window.
    pub fn to_payload(&self, window_seconds: f64) -> Option<String> {
        let cue = self.to_cue(window_seconds)?;
        let sep = CueFormat::WebVtt.fraction_separator();

        Some(format!(
            "WEBVTT\n\n{} --> {}\n{}\n",
            format_timestamp(cue.start, sep),
            format_timestamp(cue.end, sep),
            cue.text()
        ))
    }
}
