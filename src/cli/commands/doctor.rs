//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{LlmProvider, Settings};
use console::style;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    fn icon(&self) -> console::StyledObject<&'static str> {
        match self {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        }
    }
}

impl CheckResult {
    fn new(status: CheckStatus, name: &str, message: &str, hint: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.to_string(),
            hint: hint.map(str::to_string),
        }
    }

    fn ok(name: &str, message: &str) -> Self {
        Self::new(CheckStatus::Ok, name, message, None)
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self::new(CheckStatus::Warning, name, message, Some(hint))
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self::new(CheckStatus::Error, name, message, Some(hint))
    }

    fn print(&self) {
        println!("  {} {} - {}", self.status.icon(), style(&self.name).bold(), self.message);
        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

fn print_section(title: &str, checks: &[CheckResult]) {
    println!("{}", style(title).bold());
    for check in checks {
        check.print();
    }
    println!();
}

/// Run all diagnostic checks.
///
/// `config_path` is the `--config` override, if any.
pub fn run_doctor(settings: &Settings, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    Output::header("Samtale Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    let tools = vec![
        check_tool("ffmpeg", &["-version"], install_hint_ffmpeg(), settings.podcast.combine_audio),
        check_tool(
            &settings.generative_tts.command,
            &["--help"],
            "Needed only for --advanced-audio; set generative_tts.command in the config",
            false,
        ),
    ];
    print_section("External Tools", &tools);
    checks.extend(tools);

    let llm = vec![check_llm(settings)];
    print_section("Language Model", &llm);
    checks.extend(llm);

    let tts = vec![check_hosted_tts(settings)];
    print_section("Hosted TTS", &tts);
    checks.extend(tts);

    let dirs = check_directories(settings);
    print_section("Directories", &dirs);
    checks.extend(dirs);

    let config_path = config_path.unwrap_or_else(Settings::default_config_path);
    let config = vec![check_config_file(&config_path)];
    print_section("Configuration", &config);
    checks.extend(config);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Samtale.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Samtale is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available. Missing optional tools are warnings.
fn check_tool(name: &str, args: &[&str], hint: &str, required: bool) -> CheckResult {
    let missing = |message: &str| {
        if required {
            CheckResult::error(name, message, hint)
        } else {
            CheckResult::warning(name, message, hint)
        }
    };

    match Command::new(name).args(args).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display = if version.chars().count() > 50 {
                format!("{}...", version.chars().take(50).collect::<String>())
            } else if version.is_empty() {
                "installed".to_string()
            } else {
                version
            };

            CheckResult::ok(name, &version_display)
        }
        Ok(_) => missing("installed but not working"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => missing("not found"),
        Err(e) => missing(&format!("error: {}", e)),
    }
}

/// Report which completion backend will be used and whether it is usable.
fn check_llm(settings: &Settings) -> CheckResult {
    let llm = &settings.llm;
    let key = llm.api_key();

    match (llm.provider, llm.resolved_provider(), key) {
        (_, LlmProvider::Managed, Some(key)) => CheckResult::ok(
            "Provider",
            &format!("managed, {} ({})", llm.managed.model, mask_key(&key)),
        ),
        (LlmProvider::Managed, _, None) => CheckResult::error(
            "Provider",
            &format!("managed, but {} is not set", llm.api_key_env),
            &format!("Set with: export {}='...'", llm.api_key_env),
        ),
        _ => CheckResult::warning(
            "Provider",
            &format!("local, {} at {}", llm.local.model, llm.local.base_url),
            &format!(
                "Make sure the local server is running, or set {} to use the managed API",
                llm.api_key_env
            ),
        ),
    }
}

fn check_hosted_tts(settings: &Settings) -> CheckResult {
    let hosted = &settings.hosted_tts;
    let endpoint = format!("{}{}", hosted.base_url.trim_end_matches('/'), hosted.api_name);

    if hosted.token().is_some() {
        CheckResult::ok("Endpoint", &format!("{} (token from {})", endpoint, hosted.token_env))
    } else {
        CheckResult::warning(
            "Endpoint",
            &endpoint,
            &format!("Anonymous access; set {} if the app requires a token", hosted.token_env),
        )
    }
}

/// Check output and working directories.
fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    [("Output directory", settings.output_dir()), ("Working directory", settings.temp_dir())]
        .into_iter()
        .map(|(name, dir)| {
            if dir.exists() {
                CheckResult::ok(name, &dir.display().to_string())
            } else {
                CheckResult::warning(
                    name,
                    &format!("{} (will be created)", dir.display()),
                    "Directory will be created on first use",
                )
            }
        })
        .collect()
}

/// Check if the config file that settings were loaded from exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            &format!("using defaults (no file at {})", config_path.display()),
            "Create with: samtale config edit",
        )
    }
}

/// Show only the first and last few characters of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
