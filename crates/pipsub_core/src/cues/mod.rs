//! Subtitle cue engine.
//!
//! Parses timed-text payloads, keeps the cues on a live-adjustable offset and
//! maps a playback clock to cue change events.
//!
//! # Components
//!
//! - **time_codec**: timestamp text <-> seconds
//! - **parser**: payload -> ordered cues, malformed blocks dropped
//! - **store**: cue sequence with interval lookup and atomic bulk shift
//! - **sync**: offset owner, rounding and clamping
//! - **binder**: clock samples -> de-duplicated change events
//! - **session**: the above wired together for a host
//! - **writers**: shifted cues back to SRT or WebVTT
//!
//! # Usage
//!
//! ```ignore
//! use pipsub_core::cues::{CueSession, SessionSettings};
//!
//! let mut session = CueSession::new(SessionSettings::default());
//! session.inject(&payload, None);
//!
//! session.adjust(0.5);
//! if let Some(change) = session.on_tick(video.current_time()) {
//!     overlay.show(change.current_text());
//! }
//! ```

pub mod binder;
mod error;
pub mod parser;
pub mod session;
pub mod store;
pub mod sync;
pub mod time_codec;
pub mod transcript;
mod types;
pub mod writers;

use std::fs;
use std::path::Path;

pub use types::{ActiveCue, Cue, CueFormat, CueId};

pub use error::{BlockIssue, BlockWarning, CueError, TimestampError};

pub use binder::{CueCallback, CueChange, PlaybackBinder};
pub use parser::{parse_cues, parse_cues_with, ParseReport, ParserOptions};
pub use session::{CueSession, InjectSummary, SessionSettings};
pub use store::CueStore;
pub use sync::{NudgeDirection, Resync, SyncController, SyncLimits, SyncOffset};
pub use time_codec::{format_timestamp, parse_timestamp};
pub use transcript::TranscriptCue;
pub use writers::{write_content, write_srt, write_vtt};

/// Read and parse a cue file from disk.
///
/// # Arguments
/// * `path` - Path to an SRT or WebVTT file.
/// * `options` - Parser switches.
///
/// # Returns
/// * `Ok(ParseReport)` - Cues and dropped-block warnings.
/// * `Err(CueError)` - If the file cannot be read.
pub fn read_file(path: impl AsRef<Path>, options: &ParserOptions) -> Result<ParseReport, CueError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CueError::read(path, e))?;
    Ok(parse_cues_with(&content, options))
}

/// Write cues to a file.
///
/// The format is taken from the file extension, falling back to `fallback`.
///
/// # Returns
/// The format that was written.
pub fn write_file(
    cues: &[Cue],
    path: impl AsRef<Path>,
    fallback: CueFormat,
) -> Result<CueFormat, CueError> {
    let path = path.as_ref();
    let format = CueFormat::from_extension(path).unwrap_or(fallback);

    fs::write(path, write_content(cues, format)).map_err(|e| CueError::write(path, e))?;

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_shift_and_write() {
        let content = "1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n";

        let mut temp_file = NamedTempFile::with_suffix(".srt").unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let report = read_file(temp_file.path(), &ParserOptions::default()).unwrap();
        assert_eq!(report.cues.len(), 1);

        let store = CueStore::with_cues(report.cues);
        let mut sync = SyncController::new();
        sync.adjust(1.5, &store);

        let output_file = NamedTempFile::with_suffix(".vtt").unwrap();
        let format = write_file(&store.snapshot(), output_file.path(), CueFormat::Srt).unwrap();
        assert_eq!(format, CueFormat::WebVtt);

        let reparsed = read_file(output_file.path(), &ParserOptions::default()).unwrap();
        assert_eq!(reparsed.format, CueFormat::WebVtt);
        assert!((reparsed.cues[0].start - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(dir.path().join("missing.srt"), &ParserOptions::default());
        assert!(matches!(result, Err(CueError::ReadError { .. })));
    }
}
