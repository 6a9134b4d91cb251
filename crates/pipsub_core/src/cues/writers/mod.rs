//! Cue writers.
//!
//! Each writer is a pure function over a cue slice, usually a
//! [`CueStore::snapshot`](crate::cues::CueStore::snapshot) taken after resync.

mod srt;
mod vtt;

pub use srt::write_srt;
pub use vtt::write_vtt;

use crate::cues::types::{Cue, CueFormat};

/// Write cues to a string in the requested format.
pub fn write_content(cues: &[Cue], format: CueFormat) -> String {
    match format {
        CueFormat::Srt => write_srt(cues),
        CueFormat::WebVtt => write_vtt(cues),
    }
}

/// Cues that still have visible time after a backward shift.
///
/// A cue ending at or before zero would collapse to `00:00:00 --> 00:00:00`
/// once timestamps are clamped, so it is left out.
fn writable(cues: &[Cue]) -> impl Iterator<Item = &Cue> {
    cues.iter().filter(|cue| cue.end > 0.0)
}
