//! Live resync controller.
//!
//! Owns the user-facing subtitle offset. Every update is rounded to tenths of
//! a second and clamped to the configured bound; only the delta actually
//! applied is propagated to the [`CueStore`].
//!
//! ```text
//! offset 29.8  --adjust(+5.0)-->  offset 30.0, cues shifted by +0.2
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::store::CueStore;

/// Default offset bound in seconds.
pub const DEFAULT_MAX_OFFSET: f64 = 30.0;

/// Default nudge step in seconds.
pub const DEFAULT_STEP: f64 = 0.5;

/// Round to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // Normalize -0.0 so it displays as "0.0s"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Bounds and step size for offset updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncLimits {
    /// Offsets are clamped to `[-max_offset, +max_offset]`.
    pub max_offset: f64,
    /// Amount applied by a single nudge.
    pub step: f64,
}

impl Default for SyncLimits {
    fn default() -> Self {
        Self {
            max_offset: DEFAULT_MAX_OFFSET,
            step: DEFAULT_STEP,
        }
    }
}

impl SyncLimits {
    /// Round to tenths, then clamp to the bound.
    pub fn normalize(&self, value: f64) -> f64 {
        let bound = if self.max_offset.is_nan() {
            DEFAULT_MAX_OFFSET
        } else {
            self.max_offset.abs()
        };
        round_tenths(value).clamp(-bound, bound)
    }
}

/// Direction of a stepped nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    /// Positive step: subtitles appear later.
    Up,
    /// Negative step: subtitles appear earlier.
    Down,
}

impl NudgeDirection {
    fn sign(&self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Current subtitle offset in seconds.
///
/// Displays with an explicit sign and one decimal: `+0.5s`, `-2.0s`, `0.0s`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncOffset(f64);

impl SyncOffset {
    /// The zero offset.
    pub const ZERO: Self = Self(0.0);

    /// Offset in seconds.
    pub fn seconds(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for SyncOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            write!(f, "0.0s")
        } else {
            write!(f, "{:+.1}s", self.0)
        }
    }
}

/// Outcome of an offset update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resync {
    /// Offset before the update.
    pub previous: SyncOffset,
    /// Offset after the update.
    pub offset: SyncOffset,
    /// Shift applied to every cue.
    pub applied_delta: f64,
    /// The request was cut at the bound.
    pub clamped: bool,
}

impl Resync {
    fn unchanged(offset: SyncOffset) -> Self {
        Self {
            previous: offset,
            offset,
            applied_delta: 0.0,
            clamped: false,
        }
    }

    /// Whether the cues moved.
    pub fn is_noop(&self) -> bool {
        self.applied_delta == 0.0
    }
}

/// Offset owner. The only writer of cue time bases after load.
#[derive(Debug, Clone, Default)]
pub struct SyncController {
    offset: SyncOffset,
    limits: SyncLimits,
}

impl SyncController {
    /// Create a controller at offset zero with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller at offset zero with custom limits.
    pub fn with_limits(limits: SyncLimits) -> Self {
        Self {
            offset: SyncOffset::ZERO,
            limits,
        }
    }

    /// Current offset.
    pub fn offset(&self) -> SyncOffset {
        self.offset
    }

    /// Active limits.
    pub fn limits(&self) -> SyncLimits {
        self.limits
    }

    /// Forget the offset without touching any cue.
    ///
    /// Used when a freshly parsed sequence replaces the store: the new cues
    /// carry no offset yet.
    pub fn reset(&mut self) {
        self.offset = SyncOffset::ZERO;
    }

    /// Relative update: `offset := clamp(round1(offset + delta))`.
    pub fn adjust(&mut self, delta: f64, store: &CueStore) -> Resync {
        if !delta.is_finite() {
            tracing::warn!("Ignoring non-finite offset delta {}", delta);
            return Resync::unchanged(self.offset);
        }
        let requested = self.offset.0 + delta;
        self.apply(requested, store)
    }

    /// Stepped update using the configured step size.
    pub fn nudge(&mut self, direction: NudgeDirection, store: &CueStore) -> Resync {
        self.adjust(direction.sign() * self.limits.step, store)
    }

    /// Absolute update: `offset := clamp(round1(value))`.
    pub fn set_absolute(&mut self, value: f64, store: &CueStore) -> Resync {
        if !value.is_finite() {
            tracing::warn!("Ignoring non-finite offset {}", value);
            return Resync::unchanged(self.offset);
        }
        self.apply(value, store)
    }

    fn apply(&mut self, requested: f64, store: &CueStore) -> Resync {
        let previous = self.offset;
        let target = self.limits.normalize(requested);
        let clamped = target != round_tenths(requested);

        // Both ends sit on the 0.1 grid, so rounding the difference removes
        // float noise without changing its value.
        let applied_delta = round_tenths(target - previous.0);

        if clamped {
            tracing::debug!(
                "Offset request {:+.2}s clamped to {:+.1}s",
                requested,
                target
            );
        }

        if applied_delta == 0.0 {
            return Resync {
                clamped,
                ..Resync::unchanged(previous)
            };
        }

        store.shift_all(applied_delta);
        self.offset = SyncOffset(target);

        tracing::debug!(
            "Resync {} -> {} (applied {:+.1}s)",
            previous,
            self.offset,
            applied_delta
        );

        Resync {
            previous,
            offset: self.offset,
            applied_delta,
            clamped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::types::Cue;

    fn create_test_store() -> CueStore {
        CueStore::with_cues(vec![
            Cue::new(1.0, 4.0, ["First"]),
            Cue::new(5.0, 8.0, ["Second"]),
        ])
    }

    #[test]
    fn adjust_composes_back_to_zero() {
        let store = create_test_store();
        let original = store.snapshot();
        let mut sync = SyncController::new();

        sync.adjust(0.5, &store);
        sync.adjust(0.5, &store);
        sync.adjust(-1.0, &store);

        assert_eq!(sync.offset().seconds(), 0.0);
        for (before, after) in original.iter().zip(store.snapshot()) {
            assert!((before.start - after.start).abs() < 1e-9);
            assert!((before.end - after.end).abs() < 1e-9);
        }
    }

    #[test]
    fn adjust_clamps_and_applies_actual_delta() {
        let store = create_test_store();
        let mut sync = SyncController::new();

        sync.set_absolute(29.8, &store);
        let before = store.snapshot();

        let result = sync.adjust(5.0, &store);

        assert_eq!(sync.offset().seconds(), 30.0);
        assert_eq!(result.applied_delta, 0.2);
        assert!(result.clamped);

        let after = store.snapshot();
        assert!((after[0].start - before[0].start - 0.2).abs() < 1e-9);
        assert!((after[1].end - before[1].end - 0.2).abs() < 1e-9);
    }

    #[test]
    fn adjust_at_bound_is_noop() {
        let store = create_test_store();
        let mut sync = SyncController::new();
        sync.set_absolute(-30.0, &store);

        let result = sync.adjust(-0.5, &store);

        assert!(result.is_noop());
        assert!(result.clamped);
        assert_eq!(sync.offset().seconds(), -30.0);
    }

    #[test]
    fn set_absolute_shifts_by_difference() {
        let store = create_test_store();
        let mut sync = SyncController::new();
        sync.adjust(1.0, &store);

        let result = sync.set_absolute(-2.04, &store);

        assert_eq!(sync.offset().seconds(), -2.0);
        assert_eq!(result.applied_delta, -3.0);
        assert!((store.snapshot()[0].start - -1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_delta_is_noop_after_rounding() {
        let store = create_test_store();
        let mut sync = SyncController::new();

        assert!(sync.adjust(0.0, &store).is_noop());
        assert!(sync.adjust(0.04, &store).is_noop());
        assert!((store.snapshot()[0].start - 1.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_requests_are_ignored() {
        let store = create_test_store();
        let mut sync = SyncController::new();
        sync.adjust(1.5, &store);

        assert!(sync.adjust(f64::NAN, &store).is_noop());
        assert!(sync.set_absolute(f64::INFINITY, &store).is_noop());
        assert_eq!(sync.offset().seconds(), 1.5);
    }

    #[test]
    fn many_small_steps_stay_on_grid() {
        let store = create_test_store();
        let mut sync = SyncController::new();

        for _ in 0..37 {
            sync.adjust(0.1, &store);
        }

        assert_eq!(sync.offset().seconds(), 3.7);
        assert!((store.snapshot()[0].start - 4.7).abs() < 1e-6);
    }

    #[test]
    fn nudge_uses_step() {
        let store = create_test_store();
        let mut sync = SyncController::with_limits(SyncLimits {
            max_offset: 2.0,
            step: 0.5,
        });

        sync.nudge(NudgeDirection::Up, &store);
        sync.nudge(NudgeDirection::Up, &store);
        assert_eq!(sync.offset().seconds(), 1.0);

        for _ in 0..10 {
            sync.nudge(NudgeDirection::Down, &store);
        }
        assert_eq!(sync.offset().seconds(), -2.0);
    }

    #[test]
    fn offset_display() {
        assert_eq!(SyncOffset(0.5).to_string(), "+0.5s");
        assert_eq!(SyncOffset(-2.0).to_string(), "-2.0s");
        assert_eq!(SyncOffset::ZERO.to_string(), "0.0s");
        assert_eq!(SyncOffset(round_tenths(-0.04)).to_string(), "0.0s");
    }
}
