mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands, OffsetAction};
use pipsub_core::config::ConfigManager;
use pipsub_core::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first so its logging section can seed the subscriber
    let mut config = ConfigManager::new(&cli.config);
    config
        .load_or_create()
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let log_settings = &config.settings().logging;
    logging::init_tracing(
        cli.log_level.unwrap_or(log_settings.level),
        log_settings.show_target,
    );
    tracing::debug!(
        "pipsub {} using config {}",
        pipsub_core::version(),
        config.path().display()
    );

    match cli.command {
        Commands::Inspect { file, json } => commands::inspect(&file, config.settings(), json),
        Commands::Export {
            file,
            offset,
            format,
            output,
        } => commands::export(&file, config.settings(), offset, format, output.as_deref()),
        Commands::Replay {
            file,
            offset,
            from,
            to,
            step_ms,
            json,
        } => commands::replay(&file, config.settings(), offset, from, to, step_ms, json),
        Commands::Offset { action } => match action {
            OffsetAction::Show => {
                commands::offset_show(&config);
                Ok(())
            }
            OffsetAction::Set { seconds } => commands::offset_set(&mut config, seconds).map(|_| ()),
            OffsetAction::Nudge { direction } => {
                commands::offset_nudge(&mut config, direction.into()).map(|_| ())
            }
        },
    }
}
