//! pipsub core - subtitle cue engine for a picture-in-picture overlay.
//!
//! Parsing, live resync and playback binding with no UI dependencies. The
//! overlay host (or the `pipsub` CLI) drives it through
//! [`cues::CueSession`].

pub mod config;
pub mod cues;
pub mod logging;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
