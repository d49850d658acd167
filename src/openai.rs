//! OpenAI-compatible client configuration.

use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Key sent to local endpoints that do not check it.
const UNUSED_API_KEY: &str = "not-needed";

/// Create a client for an OpenAI-compatible endpoint with the given timeout.
pub fn create_client(
    base_url: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new()
        .with_api_base(base_url.trim_end_matches('/'))
        .with_api_key(api_key.unwrap_or(UNUSED_API_KEY));

    Ok(Client::with_config(config).with_http_client(http_client))
}
