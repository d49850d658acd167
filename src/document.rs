//! Source document loading: PDFs, text files, inline text and web pages.

use crate::error::{Result, SamtaleError};
use crate::fetcher::ContentFetcher;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// One input to the podcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Source {
    /// A PDF file on disk.
    Pdf(PathBuf),
    /// A UTF-8 text or Markdown file on disk.
    TextFile(PathBuf),
    /// A web page, read through the reader proxy.
    Url(String),
    /// Text passed in directly.
    Text(String),
}

impl Source {
    /// Classify a local path by extension: `.pdf` is a PDF, anything else is text.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if is_pdf(&path) {
            Source::Pdf(path)
        } else {
            Source::TextFile(path)
        }
    }

    fn is_url(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Extract the text of a PDF file.
pub fn read_pdf(path: &Path) -> Result<String> {
    if !is_pdf(path) {
        return Err(SamtaleError::Document(format!(
            "{} is not a PDF. Please provide only PDF files.",
            path.display()
        )));
    }

    let text = pdf_extract::extract_text(path).map_err(|e| {
        SamtaleError::Document(format!("Error reading the PDF file {}: {}", path.display(), e))
    })?;

    debug!("Extracted {} characters from {}", text.len(), path.display());
    Ok(text)
}

/// Check that `input` is an absolute http(s) URL.
pub fn validate_url(input: &str) -> Result<()> {
    let parsed = url::Url::parse(input)
        .map_err(|e| SamtaleError::InvalidInput(format!("Invalid URL '{}': {}", input, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SamtaleError::InvalidInput(format!(
            "Unsupported URL scheme '{}' in {}",
            other, input
        ))),
    }
}

/// Load every source and join them with blank lines.
///
/// Local sources come first in the given order, web pages last. Fails if
/// there are no sources or the combined text exceeds `character_limit`.
#[instrument(skip_all, fields(sources = sources.len()))]
pub async fn load_sources(
    sources: &[Source],
    fetcher: &ContentFetcher,
    character_limit: usize,
) -> Result<String> {
    if sources.is_empty() {
        return Err(SamtaleError::InvalidInput(
            "Please provide at least one PDF file or a URL.".to_string(),
        ));
    }

    let ordered = sources
        .iter()
        .filter(|s| !s.is_url())
        .chain(sources.iter().filter(|s| s.is_url()));

    let mut texts = Vec::with_capacity(sources.len());
    for source in ordered {
        let text = match source {
            Source::Pdf(path) => read_pdf(path)?,
            Source::TextFile(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                SamtaleError::Document(format!("Error reading {}: {}", path.display(), e))
            })?,
            Source::Url(url) => {
                validate_url(url)?;
                fetcher.fetch(url).await?
            }
            Source::Text(text) => text.clone(),
        };
        texts.push(text);
    }

    let combined = texts.join("\n\n");
    let length = combined.chars().count();
    info!("Loaded {} characters from {} source(s)", length, sources.len());

    if length > character_limit {
        return Err(SamtaleError::InvalidInput(format!(
            "The total content is too long ({} characters). Please ensure the combined text from PDFs and URL is fewer than {} characters.",
            length, character_limit
        )));
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use std::time::Duration;

    fn offline_fetcher() -> ContentFetcher {
        ContentFetcher::with_config(
            "http://127.0.0.1:9/",
            Duration::from_millis(200),
            RetryPolicy::new(1, Duration::ZERO),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_sources_is_rejected() {
        let err = load_sources(&[], &offline_fetcher(), 100).await.unwrap_err();
        assert!(err.to_string().contains("at least one PDF file or a URL"));
    }

    #[tokio::test]
    async fn test_text_sources_are_joined_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.md");
        std::fs::write(&notes, "From the file.").unwrap();

        let sources = vec![
            Source::Text("Inline first.".to_string()),
            Source::from_path(&notes),
        ];

        let text = load_sources(&sources, &offline_fetcher(), 1_000).await.unwrap();
        assert_eq!(text, "Inline first.\n\nFrom the file.");
    }

    #[tokio::test]
    async fn test_url_text_comes_last() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/https://example.com/page")
            .with_status(200)
            .with_body("From the web.")
            .create_async()
            .await;

        let fetcher = ContentFetcher::with_config(
            &format!("{}/", server.url()),
            Duration::from_secs(5),
            RetryPolicy::new(1, Duration::ZERO),
        )
        .unwrap();

        let sources = vec![
            Source::Url("https://example.com/page".to_string()),
            Source::Text("Local text.".to_string()),
        ];

        let text = load_sources(&sources, &fetcher, 1_000).await.unwrap();
        mock.assert_async().await;
        assert_eq!(text, "Local text.\n\nFrom the web.");
    }

    #[tokio::test]
    async fn test_character_limit() {
        let sources = vec![Source::Text("x".repeat(101))];
        let err = load_sources(&sources, &offline_fetcher(), 100).await.unwrap_err();
        assert!(err.to_string().contains("too long"));

        let sources = vec![Source::Text("x".repeat(100))];
        assert!(load_sources(&sources, &offline_fetcher(), 100).await.is_ok());
    }

    #[test]
    fn test_non_pdf_is_rejected() {
        let err = read_pdf(Path::new("paper.docx")).unwrap_err();
        assert!(err.to_string().contains("not a PDF"));
    }

    #[test]
    fn test_source_from_path() {
        assert_eq!(Source::from_path("a/Paper.PDF"), Source::Pdf(PathBuf::from("a/Paper.PDF")));
        assert_eq!(Source::from_path("a/notes.txt"), Source::TextFile(PathBuf::from("a/notes.txt")));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://en.wikipedia.org/wiki/Podcast").is_ok());
        assert!(validate_url("ftp://example.com/file").is_err());
        assert!(validate_url("not a url").is_err());
    }
}
