//! Cue store.
//!
//! Holds the active cue sequence behind a lock so a bulk shift is never
//! observed half-applied by a concurrent lookup.

use parking_lot::RwLock;

use super::types::{ActiveCue, Cue, CueId};

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<(CueId, Cue)>,
    next_id: u64,
}

/// Ordered cue sequence with interval lookup and in-place resync.
///
/// Cues keep the order they were loaded in. Overlapping cues are allowed and
/// [`CueStore::find_active`] resolves them by that order.
#[derive(Debug, Default)]
pub struct CueStore {
    inner: RwLock<Inner>,
}

impl CueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `cues`.
    pub fn with_cues(cues: Vec<Cue>) -> Self {
        let store = Self::new();
        store.load(cues);
        store
    }

    /// Replace the whole sequence.
    ///
    /// Every loaded cue gets a fresh identity. No offset is re-applied.
    pub fn load(&self, cues: Vec<Cue>) {
        let mut inner = self.inner.write();
        let first_id = inner.next_id;
        let count = cues.len() as u64;

        inner.entries = cues
            .into_iter()
            .zip(first_id..)
            .map(|(cue, id)| (CueId(id), cue))
            .collect();
        inner.next_id = first_id + count;

        tracing::debug!("Loaded {} cues into store", count);
    }

    /// Drop every cue.
    pub fn clear(&self) {
        self.inner.write().entries.clear();
    }

    /// Add `delta` seconds to every cue's start and end.
    ///
    /// Shifts compose additively and are not clamped, so applying `+d` then
    /// `-d` restores the original times.
    pub fn shift_all(&self, delta: f64) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }

        let mut inner = self.inner.write();
        for (_, cue) in inner.entries.iter_mut() {
            cue.shift(delta);
        }

        tracing::debug!("Shifted {} cues by {:+.3}s", inner.entries.len(), delta);
    }

    /// First cue in stored order whose interval contains `time`.
    pub fn find_active(&self, time: f64) -> Option<ActiveCue> {
        let inner = self.inner.read();
        inner
            .entries
            .iter()
            .find(|(_, cue)| cue.contains(time))
            .map(|(id, cue)| ActiveCue {
                id: *id,
                cue: cue.clone(),
            })
    }

    /// Number of cues held.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Whether the store holds no cue.
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Copy of the current (shifted) cues in stored order.
    pub fn snapshot(&self) -> Vec<Cue> {
        self.inner
            .read()
            .entries
            .iter()
            .map(|(_, cue)| cue.clone())
            .collect()
    }

    /// End of the latest-ending cue, in seconds.
    pub fn duration(&self) -> f64 {
        self.inner
            .read()
            .entries
            .iter()
            .map(|(_, cue)| cue.end)
            .fold(0.0, f64::max)
    }
}
