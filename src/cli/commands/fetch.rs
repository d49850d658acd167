//! Fetch command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::document::validate_url;
use crate::fetcher::ContentFetcher;
use anyhow::Result;

/// Run the fetch command.
pub async fn run_fetch(url: &str, settings: &Settings) -> Result<()> {
    validate_url(url)?;

    let fetcher = ContentFetcher::new(&settings.reader)?;
    let spinner = Output::spinner(&format!("Fetching {}...", url));
    let result = fetcher.fetch(url).await;
    spinner.finish_and_clear();

    match result {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}
