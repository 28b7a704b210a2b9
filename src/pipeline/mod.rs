//! Fetch, parse, and persist the episode structure of a confirmed match.

mod parser;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::models::{ConfirmedMatch, SeriesRecord};
use crate::utils::{api_retry_config, with_retry, HttpClient};

/// Errors from the fetch/parse/persist boundary
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The confirmed match carries an unusable article URL
    #[error("invalid article url '{0}'")]
    InvalidUrl(String),

    /// Network failure while fetching the article
    #[error("failed to fetch article: {0}")]
    Fetch(String),

    /// Non-success status from the article server
    #[error("article fetch returned status {0}")]
    Api(u16),

    /// The article HTML held no parseable episode structure
    #[error("failed to parse article: {0}")]
    Parse(String),

    /// IO error writing the record
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization failure
    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Process exit code; the pipeline is opaque to the resolution layer,
    /// so every failure here shares one code
    pub fn exit_code(&self) -> i32 {
        9
    }
}

impl crate::utils::Retryable for PipelineError {
    fn transient(&self) -> Option<crate::utils::TransientError> {
        match self {
            PipelineError::Fetch(_) => Some(crate::utils::TransientError::Network),
            PipelineError::Api(429) => Some(crate::utils::TransientError::TooManyRequests),
            PipelineError::Api(status) if *status >= 500 => {
                Some(crate::utils::TransientError::ServerError)
            }
            _ => None,
        }
    }
}

/// Fetches a confirmed article, extracts its season/episode structure, and
/// writes the record to disk
///
/// Persistence only happens after a full successful parse; a failure at any
/// step leaves nothing partial behind.
#[derive(Debug, Clone)]
pub struct SeriesPipeline {
    client: Arc<HttpClient>,
    output_dir: PathBuf,
}

impl SeriesPipeline {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        Ok(Self {
            client: Arc::new(
                HttpClient::new().map_err(|e| PipelineError::Fetch(e.to_string()))?,
            ),
            output_dir: output_dir.into(),
        })
    }

    /// Fetch the article HTML at `url`
    pub async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        Url::parse(url).map_err(|_| PipelineError::InvalidUrl(url.to_string()))?;

        let client = Arc::clone(&self.client);
        let url_for_retry = url.to_string();

        let response = with_retry(api_retry_config(), || {
            let client = Arc::clone(&client);
            let url = url_for_retry.clone();
            async move {
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| PipelineError::Fetch(format!("failed to fetch {}: {}", url, e)))?;
                if !response.status().is_success() {
                    return Err(PipelineError::Api(response.status().as_u16()));
                }
                Ok(response)
            }
        })
        .await?;

        response
            .text()
            .await
            .map_err(|e| PipelineError::Fetch(format!("failed to read article body: {}", e)))
    }

    /// Extract the season/episode structure from article HTML
    pub fn parse(
        &self,
        html: &str,
        matched: &ConfirmedMatch,
        miniseries: bool,
    ) -> Result<SeriesRecord, PipelineError> {
        parser::parse_series(html, matched, miniseries)
    }

    /// Write the record as pretty-printed JSON, returning the path
    pub fn persist(&self, record: &SeriesRecord) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(format!("{}.json", slugify(&record.title)));
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;

        Ok(path)
    }

    /// Fetch → parse → persist for one confirmed match
    pub async fn run(&self, matched: &ConfirmedMatch) -> Result<PathBuf, PipelineError> {
        info!("fetching {}", matched.url());
        let html = self.fetch(matched.url()).await?;

        let record = self.parse(&html, matched, matched.is_miniseries())?;
        info!(
            "parsed {} seasons, {} episodes",
            record.season_count(),
            record.episode_count()
        );

        let path = self.persist(&record)?;
        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Directory records are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// File-system-safe name: lowercased, non-alphanumeric runs collapsed to `_`
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut gap = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('_');
            }
            gap = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("series");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Dark (2017 TV series)"), "dark_2017_tv_series");
        assert_eq!(slugify("Chernobyl (miniseries)"), "chernobyl_miniseries");
        assert_eq!(slugify("M*A*S*H"), "m_a_s_h");
        assert_eq!(slugify("***"), "series");
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let pipeline = SeriesPipeline::new("./series").unwrap();

        let err = pipeline.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidUrl(_)));
    }
}
