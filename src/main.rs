//! Samtale CLI entry point.

use anyhow::Result;
use clap::Parser;
use samtale::cli::{commands, Cli, Commands};
use samtale::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("samtale={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Execute command
    match &cli.command {
        Commands::Generate {
            podcast,
            advanced_audio,
            no_combine,
        } => {
            commands::run_generate(podcast, *advanced_audio, *no_combine, settings).await?;
        }

        Commands::Script {
            podcast,
            output,
            format,
        } => {
            commands::run_script(podcast, output.clone(), *format, settings).await?;
        }

        Commands::Fetch { url } => {
            commands::run_fetch(url, &settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
