//! Mock search client for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{QueryType, SearchResponse, SearchResult, SearchResultBuilder};
use crate::search::{SearchClient, SearchError};

/// A mock search client that returns predefined responses.
#[derive(Debug, Default)]
pub struct MockSearchClient {
    response: Mutex<Option<SearchResponse>>,
}

impl MockSearchClient {
    /// Create a new mock client.
    pub fn new() -> Self {
        Self {
            response: Mutex::new(None),
        }
    }

    /// Set the response to return.
    pub fn set_response(&self, response: SearchResponse) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(response);
    }

    /// Clear the configured response.
    pub fn clear_response(&self) {
        let mut guard = self.response.lock().unwrap();
        *guard = None;
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, name: &str) -> Result<SearchResponse, SearchError> {
        let guard = self.response.lock().unwrap();
        match &*guard {
            Some(response) => Ok(response.clone()),
            None => Ok(SearchResponse::new(Vec::new(), name)),
        }
    }
}

/// Helper function to create a mock candidate for testing.
pub fn make_result(title: &str, query_type: QueryType, confidence: f64) -> SearchResult {
    SearchResultBuilder::new(
        title,
        format!("https://example.org/wiki/{}", title.replace(' ', "_")),
    )
    .query_type(query_type)
    .confidence(confidence)
    .build()
}
