//! Search clients producing candidate series articles.
//!
//! This module defines the [`SearchClient`] trait consumed by the resolver.
//! [`WikipediaSearch`] talks to the MediaWiki opensearch API;
//! [`MockSearchClient`] scripts responses for tests. The authoritativeness
//! predicate is a provided trait method so both the automatic path and the
//! post-selection re-check share one definition of "confirmed".

mod wikipedia;

pub mod mock;

pub use mock::MockSearchClient;
pub use wikipedia::WikipediaSearch;

use crate::models::{ConfirmedMatch, SearchResponse, SearchResult};
use async_trait::async_trait;
use std::sync::Arc;

/// A lone candidate must clear this confidence to confirm without an exact
/// title hit.
const SINGLETON_CONFIDENCE_FLOOR: f64 = 0.5;

/// Interface for series search backends
#[async_trait]
pub trait SearchClient: Send + Sync + std::fmt::Debug {
    /// Search the backend for candidate series articles, in relevance order
    async fn search(&self, name: &str) -> Result<SearchResponse, SearchError>;

    /// Decide whether the result set contains the definitive match
    ///
    /// A singleton passes when its confidence clears the floor; a larger set
    /// passes only when it holds exactly one exact-title hit. Anything else
    /// is inconclusive and falls back to manual disambiguation.
    fn find_authoritative(&self, results: &[SearchResult]) -> Option<ConfirmedMatch> {
        match results {
            [] => None,
            [only] if only.confidence >= SINGLETON_CONFIDENCE_FLOOR => {
                Some(ConfirmedMatch::new(only.clone()))
            }
            _ => {
                let mut exact = results.iter().filter(|r| r.is_exact());
                match (exact.next(), exact.next()) {
                    (Some(hit), None) => Some(ConfirmedMatch::new(hit.clone())),
                    _ => None,
                }
            }
        }
    }
}

#[async_trait]
impl<C: SearchClient + ?Sized> SearchClient for Arc<C> {
    async fn search(&self, name: &str) -> Result<SearchResponse, SearchError> {
        (**self).search(name).await
    }

    fn find_authoritative(&self, results: &[SearchResult]) -> Option<ConfirmedMatch> {
        (**self).find_authoritative(results)
    }
}

/// Errors that can occur when querying a search backend
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Network or HTTP error
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status from the backend
    #[error("search backend returned status {0}")]
    Api(u16),

    /// Malformed response body
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Parse(format!("JSON: {}", err))
    }
}

impl crate::utils::Retryable for SearchError {
    fn transient(&self) -> Option<crate::utils::TransientError> {
        match self {
            SearchError::Network(_) => Some(crate::utils::TransientError::Network),
            SearchError::Api(429) => Some(crate::utils::TransientError::TooManyRequests),
            SearchError::Api(status) if *status >= 500 => {
                Some(crate::utils::TransientError::ServerError)
            }
            _ => None,
        }
    }
}
