//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use pipsub_core::config::{ConfigManager, ConfigSection, Settings};
use pipsub_core::cues::{
    self, format_timestamp, CueChange, CueFormat, CueSession, CueStore, InjectSummary,
    NudgeDirection, SyncController, SyncOffset,
};

/// Read `file` into a new session with `offset` applied.
///
/// The summary carries the dialect detected from the payload, which is what
/// the file actually holds regardless of its extension.
pub fn load_session(
    file: &Path,
    settings: &Settings,
    offset: Option<f64>,
) -> Result<(CueSession, InjectSummary)> {
    if !file.exists() {
        bail!("Subtitle file does not exist: {}", file.display());
    }

    let payload = fs::read_to_string(file)
        .with_context(|| format!("Failed to read subtitle file {}", file.display()))?;

    let mut session = CueSession::new(settings.session_settings());
    let offset = offset.unwrap_or(settings.sync.offset_seconds);
    let summary = session.inject(&payload, Some(offset));

    for warning in &summary.warnings {
        tracing::warn!("{}", warning);
    }
    if summary.cue_count == 0 {
        tracing::warn!("No cues found in {}", file.display());
    }

    Ok((session, summary))
}

pub fn inspect(file: &Path, settings: &Settings, json: bool) -> Result<()> {
    if !file.exists() {
        bail!("Subtitle file does not exist: {}", file.display());
    }

    let report = cues::read_file(file, &settings.parser)?;

    if json {
        let value = serde_json::json!({
            "file": file.display().to_string(),
            "format": report.format,
            "cues": report.cues,
            "warnings": report.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let sep = report.format.fraction_separator();
    println!("File: {}", file.display());
    println!("Format: {}", report.format);
    println!("Cues: {}", report.cues.len());
    for (i, cue) in report.cues.iter().enumerate() {
        println!(
            "  [{}] {} --> {}  {}",
            i + 1,
            format_timestamp(cue.start, sep),
            format_timestamp(cue.end, sep),
            cue.lines.join(" / ")
        );
    }

    if !report.warnings.is_empty() {
        println!("\nDropped blocks: {}", report.warnings.len());
        for warning in &report.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

pub fn export(
    file: &Path,
    settings: &Settings,
    offset: Option<f64>,
    format: Option<CueFormat>,
    output: Option<&Path>,
) -> Result<()> {
    let (session, summary) = load_session(file, settings, offset)?;
    let source_format = summary.format;

    match output {
        Some(path) => {
            let format = format
                .or_else(|| CueFormat::from_extension(path))
                .unwrap_or(source_format);
            fs::write(path, session.export(format))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "Wrote {} cues as {} to {} (offset {})",
                session.store().len(),
                format,
                path.display(),
                session.offset_display()
            );
        }
        None => print!("{}", session.export(format.unwrap_or(source_format))),
    }

    Ok(())
}

/// Feed ticks `from, from + step, ...` up to and including `to`.
pub fn replay_changes(session: &mut CueSession, from: f64, to: f64, step_ms: u64) -> Vec<CueChange> {
    let step = step_ms.max(1) as f64 / 1000.0;
    let mut changes = Vec::new();

    let mut i: u64 = 0;
    loop {
        // Index-based so long replays don't accumulate float error
        let time = from + i as f64 * step;
        if time > to {
            break;
        }
        if let Some(change) = session.on_tick(time) {
            changes.push(change);
        }
        i += 1;
    }

    changes
}

pub fn replay(
    file: &Path,
    settings: &Settings,
    offset: Option<f64>,
    from: f64,
    to: Option<f64>,
    step_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let (mut session, _) = load_session(file, settings, offset)?;
    let to = to.unwrap_or_else(|| session.store().duration() + 1.0);
    let step_ms = step_ms.unwrap_or(settings.playback.tick_interval_ms);

    if !(from.is_finite() && to.is_finite()) || to < from {
        bail!("Invalid replay range {}..{}", from, to);
    }

    tracing::info!(
        "Replaying {:.3}s..{:.3}s every {}ms at offset {}",
        from,
        to,
        step_ms,
        session.offset_display()
    );

    for change in replay_changes(&mut session, from, to, step_ms) {
        if json {
            println!("{}", serde_json::to_string(&change)?);
            continue;
        }
        let time = format_timestamp(change.time, '.');
        match change.current_text() {
            Some(text) => println!("{}  {}", time, text.replace('\n', " / ")),
            None => println!("{}  (clear)", time),
        }
    }

    Ok(())
}

/// Apply an offset update to the saved preference and persist `[sync]`.
fn update_saved_offset(
    config: &mut ConfigManager,
    update: impl FnOnce(&mut SyncController, &CueStore),
) -> Result<SyncOffset> {
    let settings = config.settings();
    let store = CueStore::new();
    let mut sync = SyncController::with_limits(settings.sync_limits());
    sync.set_absolute(settings.sync.offset_seconds, &store);

    update(&mut sync, &store);

    let offset = sync.offset();
    config.settings_mut().sync.offset_seconds = offset.seconds();
    config
        .update_section(ConfigSection::Sync)
        .with_context(|| format!("Failed to save offset to {}", config.path().display()))?;

    Ok(offset)
}

pub fn offset_show(config: &ConfigManager) {
    let store = CueStore::new();
    let mut sync = SyncController::with_limits(config.settings().sync_limits());
    sync.set_absolute(config.settings().sync.offset_seconds, &store);
    println!("{}", sync.offset());
}

pub fn offset_set(config: &mut ConfigManager, seconds: f64) -> Result<SyncOffset> {
    if !seconds.is_finite() {
        bail!("Offset must be a finite number of seconds");
    }
    let offset = update_saved_offset(config, |sync, store| {
        sync.set_absolute(seconds, store);
    })?;
    println!("{}", offset);
    Ok(offset)
}

pub fn offset_nudge(config: &mut ConfigManager, direction: NudgeDirection) -> Result<SyncOffset> {
    let offset = update_saved_offset(config, |sync, store| {
        sync.nudge(direction, store);
    })?;
    println!("{}", offset);
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const PAYLOAD: &str = "1\n00:00:01,000 --> 00:00:03,000\nHello <b>world</b>\n\n2\n00:00:03,000 --> 00:00:02,500\nBad cue, end before start\n\n3\n00:00:04,000 --> 00:00:05,000\nBye\n";

    fn write_payload() -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".srt").unwrap();
        file.write_all(PAYLOAD.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_session_applies_saved_offset() {
        let file = write_payload();
        let mut settings = Settings::default();
        settings.sync.offset_seconds = 1.0;

        let (session, summary) = load_session(file.path(), &settings, None).unwrap();
        assert_eq!(summary.format, CueFormat::Srt);
        assert_eq!(session.offset_display(), "+1.0s");
        assert!((session.cues()[0].start - 2.0).abs() < 1e-9);

        let (session, _) = load_session(file.path(), &settings, Some(-0.5)).unwrap();
        assert_eq!(session.offset_display(), "-0.5s");
    }

    #[test]
    fn load_session_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_session(&dir.path().join("nope.srt"), &Settings::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn replay_reports_each_transition_once() {
        let file = write_payload();
        let (mut session, _) = load_session(file.path(), &Settings::default(), None).unwrap();

        let changes = replay_changes(&mut session, 0.0, 6.0, 250);
        let texts: Vec<Option<String>> = changes.iter().map(CueChange::current_text).collect();

        assert_eq!(
            texts,
            vec![
                Some("Hello world".to_string()),
                None,
                Some("Bye".to_string()),
                None
            ]
        );
        assert!((changes[0].time - 1.0).abs() < 1e-9);
        assert!((changes[1].time - 3.25).abs() < 1e-9);
    }

    #[test]
    fn export_writes_shifted_vtt() {
        let file = write_payload();
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.vtt");

        export(file.path(), &Settings::default(), Some(0.5), None, Some(&output)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("WEBVTT\n\n00:00:01.500 --> 00:00:03.500\nHello world\n"));
        assert!(!written.contains("Bad cue"));
    }

    #[test]
    fn export_keeps_detected_dialect_for_unknown_extensions() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(b"WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nCaption\n")
            .unwrap();
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");

        let (_, summary) = load_session(file.path(), &Settings::default(), None).unwrap();
        assert_eq!(summary.format, CueFormat::WebVtt);

        export(file.path(), &Settings::default(), None, None, Some(&output)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nCaption\n"));
    }

    #[test]
    fn explicit_format_overrides_detected_dialect() {
        let file = write_payload();
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");

        export(
            file.path(),
            &Settings::default(),
            None,
            Some(CueFormat::WebVtt),
            Some(&output),
        )
        .unwrap();

        assert!(fs::read_to_string(&output).unwrap().starts_with("WEBVTT"));
    }

    #[test]
    fn offset_commands_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipsub.toml");
        let mut config = ConfigManager::new(&path);
        config.load_or_create().unwrap();

        assert_eq!(offset_set(&mut config, 29.8).unwrap().seconds(), 29.8);
        assert_eq!(
            offset_nudge(&mut config, NudgeDirection::Up).unwrap().seconds(),
            30.0
        );
        offset_nudge(&mut config, NudgeDirection::Down).unwrap();

        let mut reloaded = ConfigManager::new(&path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings().sync.offset_seconds, 29.5);
    }
}
