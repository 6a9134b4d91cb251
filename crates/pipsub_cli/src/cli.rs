use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use pipsub_core::cues::{CueFormat, NudgeDirection};
use pipsub_core::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "pipsub")]
#[command(author, version, about = "Subtitle cue engine for picture-in-picture playback")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, default_value = ".config/pipsub.toml")]
    pub config: PathBuf,

    /// Log level (overrides the config file; RUST_LOG overrides both)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a subtitle file and list its cues and dropped blocks
    Inspect {
        /// Subtitle file (SRT or WebVTT)
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a subtitle file with an offset applied
    Export {
        /// Subtitle file (SRT or WebVTT)
        #[arg(required = true)]
        file: PathBuf,

        /// Offset in seconds (defaults to the saved offset)
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<f64>,

        /// Output format: srt or vtt (defaults to the output extension, then the input dialect)
        #[arg(long)]
        format: Option<CueFormat>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drive the playback binder with a synthetic clock and print cue changes
    Replay {
        /// Subtitle file (SRT or WebVTT)
        #[arg(required = true)]
        file: PathBuf,

        /// Offset in seconds (defaults to the saved offset)
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<f64>,

        /// Clock start in seconds
        #[arg(long, default_value_t = 0.0)]
        from: f64,

        /// Clock end in seconds (defaults to one second past the last cue)
        #[arg(long)]
        to: Option<f64>,

        /// Tick interval in milliseconds (defaults to the configured interval)
        #[arg(long)]
        step_ms: Option<u64>,

        /// Print one JSON object per change
        #[arg(long)]
        json: bool,
    },

    /// Show or change the saved subtitle offset
    Offset {
        #[command(subcommand)]
        action: OffsetAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum OffsetAction {
    /// Print the saved offset
    Show,

    /// Save an absolute offset in seconds
    Set {
        #[arg(allow_negative_numbers = true)]
        seconds: f64,
    },

    /// Move the saved offset by one configured step
    Nudge {
        #[arg(value_enum)]
        direction: Direction,
    },
}

/// Nudge direction as typed on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Subtitles later
    Up,
    /// Subtitles earlier
    Down,
}

impl From<Direction> for NudgeDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => NudgeDirection::Up,
            Direction::Down => NudgeDirection::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_with_negative_offset() {
        let cli = Cli::try_parse_from([
            "pipsub", "export", "movie.srt", "--offset", "-2.5", "--format", "vtt",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from(".config/pipsub.toml"));
        match cli.command {
            Commands::Export { offset, format, output, .. } => {
                assert_eq!(offset, Some(-2.5));
                assert_eq!(format, Some(CueFormat::WebVtt));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_offset_actions() {
        let cli = Cli::try_parse_from(["pipsub", "offset", "set", "-1.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Offset { action: OffsetAction::Set { seconds } } if seconds == -1.5
        ));

        let cli = Cli::try_parse_from([
            "pipsub", "--log-level", "debug", "offset", "nudge", "down",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(
            cli.command,
            Commands::Offset { action: OffsetAction::Nudge { direction: Direction::Down } }
        ));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["pipsub", "export", "a.srt", "--format", "ass"]).is_err());
    }
}
