//! WebVTT cue writer.

use crate::cues::time_codec::format_timestamp;
use crate::cues::types::{Cue, CueFormat};

use super::writable;

/// Write cues as WebVTT text.
///
/// The header is always present, even for an empty cue list.
pub fn write_vtt(cues: &[Cue]) -> String {
    let sep = CueFormat::WebVtt.fraction_separator();
    let mut output = String::from("WEBVTT\n");

    for cue in writable(cues) {
        output.push('\n');
        output.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(cue.start, sep),
            format_timestamp(cue.end, sep)
        ));
        output.push_str(&cue.text());
        output.push('\n');
    }

    output
}
