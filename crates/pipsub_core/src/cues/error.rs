//! Cue engine error and warning types.
//!
//! Nothing in the engine aborts the host. Timestamp failures are recovered
//! line by line and malformed blocks are reported as [`BlockWarning`]s rather
//! than errors.

use std::fmt;
use std::path::PathBuf;

/// Errors surfaced by the cue engine.
#[derive(Debug, thiserror::Error)]
pub enum CueError {
    /// Failed to read a cue file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a cue file.
    #[error("Failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Timestamp parse error.
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// The requested output format cannot be produced.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl CueError {
    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }
}

/// A piece of text did not match any accepted timestamp shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestampError {
    /// Input does not look like `HH:MM:SS.mmm` or `MM:SS.mmm`.
    #[error("Invalid timestamp: '{0}'")]
    Invalid(String),

    /// Minutes or seconds field is 60 or more.
    #[error("Timestamp field out of range in '{0}'")]
    OutOfRange(String),
}

impl TimestampError {
    /// Create an invalid timestamp error.
    pub fn invalid(value: impl Into<String>) -> Self {
        Self::Invalid(value.into())
    }

    /// Create an out-of-range timestamp error.
    pub fn out_of_range(value: impl Into<String>) -> Self {
        Self::OutOfRange(value.into())
    }
}

/// Why a block produced no cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockIssue {
    /// No line held a valid `start --> end` pair.
    NoTiming,
    /// Timing was found but no text line followed it.
    NoText,
    /// End time is not after the start time.
    Degenerate,
}

impl BlockIssue {
    /// Short description used in logs and CLI output.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoTiming => "no timestamp line",
            Self::NoText => "no text",
            Self::Degenerate => "end is not after start",
        }
    }
}

/// A dropped block. Not an error: the rest of the payload still parses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BlockWarning {
    /// 1-based position of the block in the payload.
    pub block: usize,
    /// First line of the block, for diagnostics.
    pub first_line: String,
    /// Reason the block was dropped.
    pub issue: BlockIssue,
}

impl BlockWarning {
    pub fn new(block: usize, first_line: impl Into<String>, issue: BlockIssue) -> Self {
        Self {
            block,
            first_line: first_line.into(),
            issue,
        }
    }
}

impl fmt::Display for BlockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {} dropped ({}): '{}'",
            self.block,
            self.issue.description(),
            self.first_line
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_error_messages() {
        assert_eq!(
            TimestampError::invalid("abc").to_string(),
            "Invalid timestamp: 'abc'"
        );
        let err: CueError = TimestampError::out_of_range("00:61:00").into();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn block_warning_display() {
        let warning = BlockWarning::new(3, "2", BlockIssue::NoTiming);
        assert_eq!(
            warning.to_string(),
            "block 3 dropped (no timestamp line): '2'"
        );
    }
}
