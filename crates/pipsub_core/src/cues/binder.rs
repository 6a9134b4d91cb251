//! Playback binder.
//!
//! Turns a stream of playback clock samples into cue change events. An event
//! fires only when the active cue identity differs from the last one
//! reported, so a clock ticking inside one cue stays silent.

use std::fmt;

use serde::Serialize;

use super::store::CueStore;
use super::types::{ActiveCue, CueId};

/// Change notification emitted by [`PlaybackBinder::on_tick`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CueChange {
    /// Playback time that produced the change.
    pub time: f64,
    /// Cue that was active before, if any.
    pub previous: Option<ActiveCue>,
    /// Cue active now. `None` means "clear the display".
    pub current: Option<ActiveCue>,
}

impl CueChange {
    /// Text of the previous cue.
    pub fn previous_text(&self) -> Option<String> {
        self.previous.as_ref().map(ActiveCue::text)
    }

    /// Text of the current cue.
    pub fn current_text(&self) -> Option<String> {
        self.current.as_ref().map(ActiveCue::text)
    }
}

/// Subscriber invoked for every emitted change.
pub type CueCallback = Box<dyn FnMut(&CueChange) + Send>;

/// Maps clock ticks to de-duplicated cue changes.
#[derive(Default)]
pub struct PlaybackBinder {
    last: Option<ActiveCue>,
    subscriber: Option<CueCallback>,
}

impl fmt::Debug for PlaybackBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackBinder")
            .field("last", &self.last.as_ref().map(|c| c.id))
            .field("subscriber", &self.subscriber.is_some())
            .finish()
    }
}

impl PlaybackBinder {
    /// Create a binder with no subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a binder that forwards every change to `callback`.
    pub fn with_subscriber(callback: CueCallback) -> Self {
        Self {
            last: None,
            subscriber: Some(callback),
        }
    }

    /// Replace (or remove) the subscriber.
    pub fn set_subscriber(&mut self, callback: Option<CueCallback>) {
        self.subscriber = callback;
    }

    /// Identity of the last reported cue.
    pub fn last_reported(&self) -> Option<CueId> {
        self.last.as_ref().map(|c| c.id)
    }

    /// Forget the last reported cue.
    ///
    /// The next tick reports whatever is active, even if it is the same cue.
    /// Does not emit an event.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Process one playback clock sample.
    ///
    /// NaN and negative samples are ignored: no lookup, no event.
    pub fn on_tick(&mut self, store: &CueStore, time: f64) -> Option<CueChange> {
        if time.is_nan() || time < 0.0 {
            tracing::trace!("Ignoring invalid playback time {}", time);
            return None;
        }

        let current = store.find_active(time);
        let current_id = current.as_ref().map(|c| c.id);

        if current_id == self.last_reported() {
            return None;
        }

        let change = CueChange {
            time,
            previous: std::mem::replace(&mut self.last, current.clone()),
            current,
        };

        tracing::trace!(
            "Cue change at {:.3}s: {:?} -> {:?}",
            time,
            change.previous.as_ref().map(|c| c.id),
            current_id
        );

        if let Some(callback) = self.subscriber.as_mut() {
            callback(&change);
        }

        Some(change)
    }
}
