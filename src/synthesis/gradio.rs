//! Minimal client for the Gradio HTTP API.
//!
//! A prediction is two requests: `POST /gradio_api/call/<api>` queues the
//! job and returns an event id, then `GET /gradio_api/call/<api>/<id>`
//! streams server-sent events until `complete` or `error`.

use crate::error::{Result, SamtaleError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct QueuedCall {
    event_id: String,
}

/// Client for one Gradio app.
pub struct GradioClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GradioClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Call `api_name` with positional `data` and return the output array.
    pub async fn predict(&self, api_name: &str, data: Vec<Value>) -> Result<Value> {
        let endpoint = format!(
            "{}/gradio_api/call/{}",
            self.base_url,
            api_name.trim_start_matches('/')
        );

        let queued: QueuedCall = self
            .request(reqwest::Method::POST, &endpoint)
            .json(&json!({ "data": data }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Gradio job queued: {}", queued.event_id);

        let events = self
            .request(reqwest::Method::GET, &format!("{}/{}", endpoint, queued.event_id))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_events(&events)
    }

    /// Download the file referenced by a prediction output.
    ///
    /// Returns the bytes and the file extension, if the URL has one.
    pub async fn download(&self, output: &Value) -> Result<(Vec<u8>, Option<String>)> {
        let url = self.file_url(output)?;
        let bytes = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok((bytes.to_vec(), extension_of(&url)))
    }

    /// Resolve a Gradio file output (file object, URL or server path) to a URL.
    fn file_url(&self, output: &Value) -> Result<String> {
        let first = match output {
            Value::Array(items) => items.first().unwrap_or(&Value::Null),
            other => other,
        };

        let (url, path) = match first {
            Value::Object(file) => (
                file.get("url").and_then(Value::as_str),
                file.get("path").and_then(Value::as_str),
            ),
            Value::String(s) if s.starts_with("http://") || s.starts_with("https://") => (Some(s.as_str()), None),
            Value::String(s) => (None, Some(s.as_str())),
            _ => (None, None),
        };

        match (url, path) {
            (Some(url), _) => Ok(url.to_string()),
            (None, Some(path)) => Ok(format!("{}/gradio_api/file={}", self.base_url, path)),
            (None, None) => Err(SamtaleError::Synthesis(format!(
                "Gradio output has no file: {}",
                output
            ))),
        }
    }
}

/// Find the result in a server-sent event stream.
fn parse_events(body: &str) -> Result<Value> {
    let mut event = "";

    for line in body.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
        } else if let Some(data) = line.strip_prefix("data:") {
            let data = data.trim();
            match event {
                "complete" => return Ok(serde_json::from_str(data)?),
                "error" => {
                    return Err(SamtaleError::Synthesis(format!("Gradio app reported an error: {}", data)))
                }
                _ => {}
            }
        }
    }

    Err(SamtaleError::Synthesis(
        "Gradio event stream ended without a result".to_string(),
    ))
}

fn extension_of(url: &str) -> Option<String> {
    let last = url.rsplit('/').next()?;
    let last = last.split(['?', '#']).next()?;
    let (_, ext) = last.rsplit_once('.')?;
    (!ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| ext.to_lowercase())
}
