//! Search result model for candidate series articles.

use serde::{Deserialize, Serialize};

/// Confidence at or above which a candidate counts as an exact-title hit.
const EXACT_CONFIDENCE: f64 = 0.999;

/// Classification of a candidate article, derived from the trailing
/// parenthetical of its title ("(2017 TV series)", "(miniseries)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Series,
    Miniseries,
    Other,
}

impl QueryType {
    /// Returns the identifier used in logs and persisted records
    pub fn id(&self) -> &'static str {
        match self {
            QueryType::Series => "series",
            QueryType::Miniseries => "miniseries",
            QueryType::Other => "other",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A candidate series article found for a query
///
/// Produced by a search client and immutable once returned. The `confidence`
/// field is a normalized similarity score in `[0, 1]` between the requested
/// name and the candidate's base title; `1.0` marks an exact-title hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Full article title, parenthetical included
    pub title: String,

    /// Resolvable article URL
    pub url: String,

    /// Series vs. miniseries classification
    pub query_type: QueryType,

    /// Similarity between the query and the base title
    pub confidence: f64,
}

impl SearchResult {
    /// Create a new search result with required fields
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            query_type: QueryType::Other,
            confidence: 0.0,
        }
    }

    /// Whether this candidate's base title matched the query exactly
    pub fn is_exact(&self) -> bool {
        self.confidence >= EXACT_CONFIDENCE
    }

    /// Whether the article describes a miniseries
    pub fn is_miniseries(&self) -> bool {
        self.query_type == QueryType::Miniseries
    }
}

/// Builder for constructing SearchResult objects
#[derive(Debug, Clone)]
pub struct SearchResultBuilder {
    result: SearchResult,
}

impl SearchResultBuilder {
    /// Create a new builder with required fields
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            result: SearchResult::new(title, url),
        }
    }

    /// Set the classification
    pub fn query_type(mut self, query_type: QueryType) -> Self {
        self.result.query_type = query_type;
        self
    }

    /// Set the confidence score, clamped to `[0, 1]`
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.result.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Build the SearchResult
    pub fn build(self) -> SearchResult {
        self.result
    }
}

/// Ordered search response for one query
///
/// Insertion order is relevance order from the backend. The order determines
/// the numbering shown during manual disambiguation and is preserved end to
/// end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Candidates, most relevant first
    pub results: Vec<SearchResult>,

    /// Query that was executed
    pub query: String,
}

impl SearchResponse {
    /// Create a new search response
    pub fn new(results: Vec<SearchResult>, query: impl Into<String>) -> Self {
        Self {
            results,
            query: query.into(),
        }
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the response holds no candidates
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A search result established as the correct target
///
/// Can only be produced by the authoritativeness predicate, either on the
/// automatic path or after an explicit operator selection. Sole output of
/// resolution and sole input accepted by the parse pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedMatch(SearchResult);

impl ConfirmedMatch {
    pub(crate) fn new(result: SearchResult) -> Self {
        Self(result)
    }

    /// Article title
    pub fn title(&self) -> &str {
        &self.0.title
    }

    /// Article URL
    pub fn url(&self) -> &str {
        &self.0.url
    }

    /// Series vs. miniseries classification
    pub fn query_type(&self) -> QueryType {
        self.0.query_type
    }

    /// Whether the matched article describes a miniseries
    pub fn is_miniseries(&self) -> bool {
        self.0.is_miniseries()
    }

    /// The underlying search result
    pub fn as_result(&self) -> &SearchResult {
        &self.0
    }
}

impl std::fmt::Display for ConfirmedMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.0.title, self.0.query_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_builder() {
        let result = SearchResultBuilder::new("Dark (2017 TV series)", "https://example.org/Dark")
            .query_type(QueryType::Series)
            .confidence(1.0)
            .build();

        assert_eq!(result.title, "Dark (2017 TV series)");
        assert_eq!(result.query_type, QueryType::Series);
        assert!(result.is_exact());
        assert!(!result.is_miniseries());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let result = SearchResultBuilder::new("Dark", "https://example.org/Dark")
            .confidence(1.7)
            .build();

        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_query_type_display() {
        assert_eq!(QueryType::Series.to_string(), "series");
        assert_eq!(QueryType::Miniseries.to_string(), "miniseries");
        assert_eq!(QueryType::Other.to_string(), "other");
    }

    #[test]
    fn test_response_preserves_order() {
        let response = SearchResponse::new(
            vec![
                SearchResult::new("B", "https://example.org/B"),
                SearchResult::new("A", "https://example.org/A"),
            ],
            "b",
        );

        assert_eq!(response.len(), 2);
        assert_eq!(response.results[0].title, "B");
        assert_eq!(response.results[1].title, "A");
    }

    #[test]
    fn test_confirmed_match_accessors() {
        let result = SearchResultBuilder::new("Chernobyl (miniseries)", "https://example.org/ch")
            .query_type(QueryType::Miniseries)
            .confidence(1.0)
            .build();
        let confirmed = ConfirmedMatch::new(result);

        assert_eq!(confirmed.title(), "Chernobyl (miniseries)");
        assert!(confirmed.is_miniseries());
        assert_eq!(confirmed.to_string(), "Chernobyl (miniseries) (miniseries)");
    }
}
