//! Timestamp codec.
//!
//! Accepted shapes:
//! ```text
//! HH:MM:SS.mmm    01:02:03.450
//! HH:MM:SS,mmm    01:02:03,450
//! MM:SS.mmm       02:03.450
//! ```
//!
//! The fractional part may have any number of digits (normalized to seconds)
//! and may be omitted. Hours may exceed two digits.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::TimestampError;

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{1,2})(?:[.,](\d+))?$").expect("timestamp pattern")
});

/// Parse a timestamp into seconds.
///
/// # Arguments
/// * `text` - Timestamp text, surrounding whitespace is ignored.
///
/// # Returns
/// * `Ok(seconds)` - Parsed offset, always `>= 0`.
/// * `Err(TimestampError)` - If the text matches no accepted shape.
pub fn parse_timestamp(text: &str) -> Result<f64, TimestampError> {
    let trimmed = text.trim();
    let caps = TIMESTAMP
        .captures(trimmed)
        .ok_or_else(|| TimestampError::invalid(trimmed))?;

    let field = |idx: usize| -> Result<u64, TimestampError> {
        match caps.get(idx) {
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .map_err(|_| TimestampError::invalid(trimmed)),
            None => Ok(0),
        }
    };

    let has_hours = caps.get(1).is_some();
    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;

    if seconds >= 60 || (has_hours && minutes >= 60) {
        return Err(TimestampError::out_of_range(trimmed));
    }

    // Normalize the fraction by its digit count: "5" -> 0.5, "050" -> 0.05
    let fraction = match caps.get(4) {
        Some(m) => {
            let digits = m.as_str();
            let value: f64 = digits
                .parse()
                .map_err(|_| TimestampError::invalid(trimmed))?;
            value / 10f64.powi(digits.len() as i32)
        }
        None => 0.0,
    };

    Ok(hours as f64 * 3600.0 + (minutes * 60 + seconds) as f64 + fraction)
}

/// Format seconds as `HH:MM:SS<sep>mmm`.
///
/// Rounds to the nearest millisecond. Negative values, which can appear after
/// a large backward resync, are clamped to zero.
pub fn format_timestamp(seconds: f64, separator: char) -> String {
    let total_ms = if seconds.is_finite() {
        (seconds.max(0.0) * 1000.0).round() as u64
    } else {
        0
    };

    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, mins, secs, separator, millis
    )
}
