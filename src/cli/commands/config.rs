//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Run the config command.
///
/// `config_path` is the `--config` override; every action uses it when given.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: Option<PathBuf>) -> Result<()> {
    let path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            if path.exists() {
                println!("# Loaded from {}", path.display());
            } else {
                println!("# Defaults (no file at {})", path.display());
            }
            println!("{}", toml::to_string_pretty(&settings).context("Failed to serialize config")?);
        }
        ConfigAction::Edit => edit(&settings, &path)?,
        ConfigAction::Path => println!("{}", path.display()),
    }

    Ok(())
}

/// Open the file in `$EDITOR`, writing the defaults first if it is missing,
/// then parse it again so mistakes show up right away.
fn edit(settings: &Settings, path: &Path) -> Result<()> {
    let path = path.to_path_buf();
    if !path.exists() {
        settings.save_to(&path)?;
        Output::info(&format!("Created default config at {}", path.display()));
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    Output::info(&format!("Opening config in {}...", editor));

    match std::process::Command::new(&editor).arg(&path).status() {
        Ok(status) if status.success() => {}
        Ok(_) => {
            Output::warning("Editor exited with non-zero status.");
            return Ok(());
        }
        Err(e) => {
            Output::error(&format!("Failed to open editor: {}", e));
            Output::info(&format!("Config file is at: {}", path.display()));
            return Ok(());
        }
    }

    match Settings::load_from(Some(&path)) {
        Ok(_) => Output::success("Config saved."),
        Err(e) => Output::warning(&format!("Config saved, but it does not parse: {}", e)),
    }
    Ok(())
}
