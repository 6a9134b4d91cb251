//! Cue session.
//!
//! Bundles the store, the offset controller and the playback binder behind
//! the handful of calls a host needs:
//!
//! ```text
//! inject(payload) -> on_tick(t)* -> adjust/nudge/set_absolute -> on_tick(t)* -> stop()
//! ```

use serde::{Deserialize, Serialize};

use super::binder::{CueCallback, CueChange, PlaybackBinder};
use super::error::BlockWarning;
use super::parser::{parse_cues_with, ParserOptions};
use super::store::CueStore;
use super::sync::{NudgeDirection, Resync, SyncController, SyncLimits, SyncOffset};
use super::transcript::{TranscriptCue, DEFAULT_CUE_WINDOW};
use super::types::{Cue, CueFormat};
use super::writers::write_content;

/// Tunables for a [`CueSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub limits: SyncLimits,
    pub parser: ParserOptions,
    /// On-screen window for transcript cues, in seconds.
    pub cue_window_seconds: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            limits: SyncLimits::default(),
            parser: ParserOptions::default(),
            cue_window_seconds: DEFAULT_CUE_WINDOW,
        }
    }
}

/// What an injected payload produced.
#[derive(Debug, Clone, Serialize)]
pub struct InjectSummary {
    pub format: CueFormat,
    pub cue_count: usize,
    pub warnings: Vec<BlockWarning>,
    /// Offset in effect after the inject.
    pub offset: SyncOffset,
}

/// One playback timeline: cues, offset and active-cue tracking.
#[derive(Debug, Default)]
pub struct CueSession {
    store: CueStore,
    sync: SyncController,
    binder: PlaybackBinder,
    settings: SessionSettings,
}

impl CueSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            store: CueStore::new(),
            sync: SyncController::with_limits(settings.limits),
            binder: PlaybackBinder::new(),
            settings,
        }
    }

    /// Register a change subscriber, replacing any previous one.
    pub fn subscribe(&mut self, callback: CueCallback) {
        self.binder.set_subscriber(Some(callback));
    }

    /// Replace the cues with a freshly parsed payload.
    ///
    /// The offset restarts at zero; `offset`, when given, is then applied as
    /// an absolute update. The active-cue state is kept, so the next tick
    /// reports the switch from the old cue to the new one.
    pub fn inject(&mut self, payload: &str, offset: Option<f64>) -> InjectSummary {
        let report = parse_cues_with(payload, &self.settings.parser);

        self.store.load(report.cues);
        self.sync.reset();
        if let Some(value) = offset {
            self.sync.set_absolute(value, &self.store);
        }

        let summary = InjectSummary {
            format: report.format,
            cue_count: self.store.len(),
            warnings: report.warnings,
            offset: self.sync.offset(),
        };

        tracing::info!(
            "Injected {} cues ({}), {} blocks dropped, offset {}",
            summary.cue_count,
            summary.format,
            summary.warnings.len(),
            summary.offset
        );

        summary
    }

    /// Replace the cues with a recognized utterance at offset zero.
    ///
    /// The cue is built from the utterance directly rather than parsed from
    /// text, so numeric or multi-paragraph speech survives intact. Returns
    /// `None` when the utterance is blank; the current cues are kept.
    pub fn inject_transcript(&mut self, transcript: &TranscriptCue) -> Option<InjectSummary> {
        let cue = transcript.to_cue(self.settings.cue_window_seconds)?;

        self.store.load(vec![cue]);
        self.sync.reset();

        tracing::debug!(
            "Injected transcript cue at {:.3}s",
            transcript.anchor_seconds
        );

        Some(InjectSummary {
            format: CueFormat::WebVtt,
            cue_count: self.store.len(),
            warnings: Vec::new(),
            offset: self.sync.offset(),
        })
    }

    /// Relative offset update.
    pub fn adjust(&mut self, delta: f64) -> Resync {
        self.sync.adjust(delta, &self.store)
    }

    /// Step the offset by the configured amount.
    pub fn nudge(&mut self, direction: NudgeDirection) -> Resync {
        self.sync.nudge(direction, &self.store)
    }

    /// Absolute offset update.
    pub fn set_absolute(&mut self, value: f64) -> Resync {
        self.sync.set_absolute(value, &self.store)
    }

    /// Feed one playback clock sample.
    pub fn on_tick(&mut self, time: f64) -> Option<CueChange> {
        self.binder.on_tick(&self.store, time)
    }

    /// Current offset.
    pub fn offset(&self) -> SyncOffset {
        self.sync.offset()
    }

    /// Offset formatted for display, e.g. `+0.5s`.
    pub fn offset_display(&self) -> String {
        self.sync.offset().to_string()
    }

    /// Current (shifted) cues rendered in `format`.
    pub fn export(&self, format: CueFormat) -> String {
        write_content(&self.store.snapshot(), format)
    }

    /// Current (shifted) cues.
    pub fn cues(&self) -> Vec<Cue> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &CueStore {
        &self.store
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// End playback: drop the cues and forget the active cue.
    ///
    /// The offset is kept so a later inject can report it; inject resets it
    /// anyway. No event is emitted.
    pub fn stop(&mut self) {
        self.binder.reset();
        self.store.clear();
        tracing::debug!("Session stopped");
    }
}
