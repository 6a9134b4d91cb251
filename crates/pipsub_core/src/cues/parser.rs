//! Timed-text cue parser.
//!
//! Handles SubRip and WebVTT style payloads and the loose variants found in
//! scraped archives:
//! ```text
//! WEBVTT                            <- header marker, discarded
//!
//! 1                                 <- index line, discarded
//! 00:00:01,000 --> 00:00:04,000     <- first valid timing line
//! Hello, <i>world</i>!              <- text, markup stripped
//! ```
//!
//! Blocks are separated by one or more blank lines. A block that yields no
//! cue is dropped and recorded as a [`BlockWarning`]; parsing never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{BlockIssue, BlockWarning};
use super::time_codec::parse_timestamp;
use super::types::{Cue, CueFormat};

static BLOCK_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("block separator pattern"));
static INDEX_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("index pattern"));
static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^WEBVTT(?:[ \t].*)?$").expect("header pattern"));
static TIMING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+?)\s*-->\s*(\S+)(?:\s.*)?$").expect("timing pattern")
});
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern"));

/// WebVTT blocks that carry metadata rather than cues.
const METADATA_PREFIXES: [&str; 3] = ["NOTE", "STYLE", "REGION"];

/// Parser behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Stable-sort the output by start time. Off by default: payload order is
    /// kept so overlapping cues resolve in the order they were written.
    #[serde(default)]
    pub sort_by_start: bool,
}

/// Result of parsing a payload.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Cues in payload order (or start order when sorting is enabled).
    pub cues: Vec<Cue>,
    /// Blocks that were dropped.
    pub warnings: Vec<BlockWarning>,
    /// Dialect detected from the header marker.
    pub format: CueFormat,
}

impl ParseReport {
    /// Whether the payload produced no usable cue.
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Parse a payload into cues with default options.
pub fn parse_cues(payload: &str) -> Vec<Cue> {
    parse_cues_with(payload, &ParserOptions::default()).cues
}

/// Parse a payload into cues, collecting dropped-block warnings.
///
/// # Arguments
/// * `payload` - Raw timed-text document.
/// * `options` - Parser switches.
///
/// # Returns
/// A [`ParseReport`]. An empty cue list is a valid result.
pub fn parse_cues_with(payload: &str, options: &ParserOptions) -> ParseReport {
    let normalized = payload
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut report = ParseReport {
        format: CueFormat::detect(&normalized),
        ..Default::default()
    };

    let blocks = BLOCK_SEPARATOR
        .split(normalized.trim())
        .filter(|block| !block.trim().is_empty());

    for (idx, block) in blocks.enumerate() {
        let block_number = idx + 1;
        match parse_block(block) {
            Ok(cue) => report.cues.push(cue),
            Err(issue) => {
                let first_line = block.lines().next().unwrap_or_default().trim();
                if is_metadata_block(first_line) {
                    tracing::trace!("Skipping metadata block {}: '{}'", block_number, first_line);
                    continue;
                }
                let warning = BlockWarning::new(block_number, first_line, issue);
                tracing::debug!("{}", warning);
                report.warnings.push(warning);
            }
        }
    }

    if options.sort_by_start {
        report.cues.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    tracing::debug!(
        "Parsed {} cues ({}), {} blocks dropped",
        report.cues.len(),
        report.format,
        report.warnings.len()
    );

    report
}

/// Parse one block into a cue.
fn parse_block(block: &str) -> Result<Cue, BlockIssue> {
    let lines: Vec<&str> = block.lines().map(str::trim).collect();

    let (timing_idx, start, end) = find_timing(&lines).ok_or(BlockIssue::NoTiming)?;

    let text_lines: Vec<String> = lines[timing_idx + 1..]
        .iter()
        .filter(|line| is_text_line(line))
        .map(|line| strip_markup(line))
        .filter(|line| !line.is_empty())
        .collect();

    if text_lines.is_empty() {
        return Err(BlockIssue::NoText);
    }

    if end <= start {
        return Err(BlockIssue::Degenerate);
    }

    Ok(Cue {
        start,
        end,
        lines: text_lines,
    })
}

/// Find the first line holding a valid `start --> end` pair.
///
/// Lines with an arrow but unparseable timestamps are skipped, not fatal.
fn find_timing(lines: &[&str]) -> Option<(usize, f64, f64)> {
    lines.iter().enumerate().find_map(|(i, line)| {
        let (start, end) = parse_timing_line(line)?;
        Some((i, start, end))
    })
}

/// Parse a timing line: `START --> END [settings]`.
///
/// Trailing WebVTT cue settings (`align:start` etc.) are ignored.
fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let caps = TIMING_LINE.captures(line)?;
    match (parse_timestamp(&caps[1]), parse_timestamp(&caps[2])) {
        (Ok(start), Ok(end)) => Some((start, end)),
        (Err(e), _) | (_, Err(e)) => {
            tracing::trace!("Skipping timing line '{}': {}", line, e);
            None
        }
    }
}

/// Lines after the timing line are text unless they are an index, a header
/// or another valid timing line. An arrow alone does not make a timing line.
fn is_text_line(line: &str) -> bool {
    !line.is_empty()
        && !INDEX_LINE.is_match(line)
        && !HEADER_LINE.is_match(line)
        && parse_timing_line(line).is_none()
}

fn is_metadata_block(first_line: &str) -> bool {
    HEADER_LINE.is_match(first_line)
        || METADATA_PREFIXES
            .iter()
            .any(|prefix| first_line.starts_with(prefix))
}

/// Remove `<...>` markup tags and trim the result.
fn strip_markup(line: &str) -> String {
    MARKUP.replace_all(line, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_srt() {
        let content = r#"1
00:00:01,000 --> 00:00:04,000
Hello, world!

2
00:00:05,000 --> 00:00:08,000
This is a test.
With multiple lines.

3
00:00:09,000 --> 00:00:12,000
Final subtitle.
"#;

        let report = parse_cues_with(content, &ParserOptions::default());

        assert_eq!(report.format, CueFormat::Srt);
        assert_eq!(report.cues.len(), 3);
        assert!(report.warnings.is_empty());

        assert!((report.cues[0].start - 1.0).abs() < 1e-9);
        assert!((report.cues[0].end - 4.0).abs() < 1e-9);
        assert_eq!(report.cues[0].text(), "Hello, world!");

        assert_eq!(
            report.cues[1].lines,
            vec!["This is a test.", "With multiple lines."]
        );
        assert_eq!(report.cues[2].text(), "Final subtitle.");
    }

    #[test]
    fn test_example_payload_drops_degenerate_cue() {
        let content = "1\n00:00:01,000 --> 00:00:03,000\nHello <b>world</b>\n\n2\n00:00:03,000 --> 00:00:02,500\nBad cue, end before start\n";

        let report = parse_cues_with(content, &ParserOptions::default());

        assert_eq!(report.cues.len(), 1);
        assert!((report.cues[0].start - 1.0).abs() < 1e-9);
        assert!((report.cues[0].end - 3.0).abs() < 1e-9);
        assert_eq!(report.cues[0].text(), "Hello world");

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].block, 2);
        assert_eq!(report.warnings[0].issue, BlockIssue::Degenerate);
    }

    #[test]
    fn test_index_only_block_is_dropped() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nFirst\n\n2\n\n3\n00:00:03,000 --> 00:00:04,000\nThird\n";

        let report = parse_cues_with(content, &ParserOptions::default());

        assert_eq!(report.cues.len(), 2);
        assert_eq!(report.cues[0].text(), "First");
        assert_eq!(report.cues[1].text(), "Third");
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].issue, BlockIssue::NoTiming);
    }

    #[test]
    fn test_parse_webvtt_with_header_and_settings() {
        let content = "WEBVTT - Some title\n\nNOTE this is a comment\n\nintro\n00:01.000 --> 00:04.000 align:start position:10%\n<v Roger>Hi there</v>\n\n00:00:05.000 --> 00:00:06.500\nSecond\n";

        let report = parse_cues_with(content, &ParserOptions::default());

        assert_eq!(report.format, CueFormat::WebVtt);
        assert_eq!(report.cues.len(), 2);
        assert!(report.warnings.is_empty());
        assert_eq!(report.cues[0].text(), "Hi there");
        assert!((report.cues[0].start - 1.0).abs() < 1e-9);
        assert!((report.cues[1].end - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_header_without_blank_line() {
        let content = "WEBVTT\n00:00:00.000 --> 00:00:10.000\nlive transcript";
        let cues = parse_cues(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text(), "live transcript");
    }

    #[test]
    fn test_crlf_and_whitespace_separators() {
        let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nOne\r\n  \r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nTwo\r\n";
        let cues = parse_cues(content);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1].text(), "Two");
    }

    #[test]
    fn test_invalid_timing_line_is_skipped_within_block() {
        let content = "1\nxx:yy --> zz\n00:00:01,000 --> 00:00:02,000\nRecovered\n";
        let cues = parse_cues(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text(), "Recovered");
    }

    #[test]
    fn test_arrow_in_caption_text_is_kept() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nWait-->go\nA --> B\n";
        let cues = parse_cues(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].lines, vec!["Wait-->go", "A --> B"]);
    }

    #[test]
    fn test_second_timing_line_is_not_text() {
        let content = "00:00:01,000 --> 00:00:02,000\n00:00:03,000 --> 00:00:04,000\nOnly text\n";
        let cues = parse_cues(content);
        assert_eq!(cues[0].text(), "Only text");
        assert!((cues[0].start - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_block_without_text_is_dropped() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\n<i></i>\n";
        let report = parse_cues_with(content, &ParserOptions::default());
        assert!(report.is_empty());
        assert_eq!(report.warnings[0].issue, BlockIssue::NoText);
    }

    #[test]
    fn test_garbage_payload_yields_no_cues() {
        let report = parse_cues_with("<html>not subtitles</html>", &ParserOptions::default());
        assert!(report.is_empty());
        assert_eq!(report.warnings.len(), 1);

        assert!(parse_cues("").is_empty());
    }

    #[test]
    fn test_order_kept_unless_sorting_requested() {
        let content = "00:00:05,000 --> 00:00:06,000\nLater\n\n00:00:01,000 --> 00:00:02,000\nEarlier\n";

        let unsorted = parse_cues(content);
        assert_eq!(unsorted[0].text(), "Later");

        let options = ParserOptions {
            sort_by_start: true,
        };
        let sorted = parse_cues_with(content, &options).cues;
        assert_eq!(sorted[0].text(), "Earlier");
        assert_eq!(sorted[1].text(), "Later");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<i>Italic</i> text"), "Italic text");
        assert_eq!(strip_markup("<font color=\"red\">Red</font>"), "Red");
        assert_eq!(strip_markup("No tags"), "No tags");
    }
}
