//! Source acquisition: local files or raw text over HTTP.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use blockdex_core::Document;
use tracing::info;

/// Where a source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Treats `http://` and `https://` inputs as URLs, everything else as a
    /// path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_string())
        } else {
            Self::File(PathBuf::from(input))
        }
    }

    /// Display name used for the resulting document.
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }

    /// Reads the complete text.
    ///
    /// Fails with a "source unavailable" error if the file cannot be read or
    /// the server does not answer with a success status.
    pub async fn load(&self, client: &reqwest::Client) -> Result<Document> {
        let text = match self {
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("source unavailable: {}", path.display()))?,
            Self::Url(url) => fetch(client, url)
                .await
                .with_context(|| format!("source unavailable: {url}"))?,
        };

        let text = text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text);
        info!(source = %self.name(), bytes = text.len(), "source loaded");
        Ok(Document::new(self.name(), text))
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Loads every input in order.
pub async fn load_all(inputs: &[String]) -> Result<Vec<Document>> {
    if inputs.is_empty() {
        bail!("no input sources given");
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("blockdex/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP client")?;

    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        documents.push(Source::parse(input).load(&client).await?);
    }
    Ok(documents)
}
