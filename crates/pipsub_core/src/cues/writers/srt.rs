//! SRT cue writer.

use crate::cues::time_codec::format_timestamp;
use crate::cues::types::{Cue, CueFormat};

use super::writable;

/// Write cues as SubRip text with 1-based indices.
pub fn write_srt(cues: &[Cue]) -> String {
    let sep = CueFormat::Srt.fraction_separator();
    let mut output = String::new();

    for (i, cue) in writable(cues).enumerate() {
        if i > 0 {
            output.push('\n');
        }

        output.push_str(&format!("{}\n", i + 1));
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
