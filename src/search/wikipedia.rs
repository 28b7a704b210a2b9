//! Wikipedia search backend over the MediaWiki opensearch API.

use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

use crate::models::{QueryType, SearchResponse, SearchResultBuilder};
use crate::search::{SearchClient, SearchError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const DEFAULT_LANG: &str = "en";
const DEFAULT_MAX_RESULTS: usize = 10;

/// Wikipedia search backend
///
/// Queries the opensearch endpoint of a language edition; titles come back
/// in relevance order, which the resolver preserves for the operator.
#[derive(Debug, Clone)]
pub struct WikipediaSearch {
    client: Arc<HttpClient>,
    endpoint: String,
    max_results: usize,
    kind_re: Regex,
}

impl WikipediaSearch {
    pub fn new() -> Result<Self, SearchError> {
        Self::for_language(DEFAULT_LANG)
    }

    /// Target a specific language edition
    pub fn for_language(lang: &str) -> Result<Self, SearchError> {
        Self::with_endpoint(format!("https://{}.wikipedia.org/w/api.php", lang))
    }

    /// Target an explicit API endpoint (tests point this at a local server)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, SearchError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            endpoint: endpoint.into(),
            max_results: DEFAULT_MAX_RESULTS,
            // "(TV series)", "(2017 TV series)", "(miniseries)", year ranges included
            kind_re: Regex::new(r"(?i)\s*\((?:\d{4}(?:–\d{4})?\s+)?(tv series|miniseries)\)\s*$")
                .map_err(|e| SearchError::InvalidRequest(format!("bad title pattern: {}", e)))?,
        })
    }

    /// Set the maximum number of candidates returned per query
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Strip the trailing series parenthetical, leaving the base title
    fn base_title<'a>(&self, title: &'a str) -> &'a str {
        match self.kind_re.find(title) {
            Some(m) => title[..m.start()].trim_end(),
            None => title.trim(),
        }
    }

    fn classify(&self, title: &str) -> QueryType {
        match self.kind_re.captures(title).and_then(|c| c.get(1)) {
            Some(kind) if kind.as_str().eq_ignore_ascii_case("miniseries") => QueryType::Miniseries,
            Some(_) => QueryType::Series,
            None => QueryType::Other,
        }
    }

    fn score(&self, name: &str, title: &str) -> f64 {
        strsim::normalized_levenshtein(
            &name.trim().to_lowercase(),
            &self.base_title(title).to_lowercase(),
        )
    }
}

#[async_trait]
impl SearchClient for WikipediaSearch {
    async fn search(&self, name: &str) -> Result<SearchResponse, SearchError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(SearchResponse::new(Vec::new(), name));
        }

        let url = format!(
            "{}?action=opensearch&search={}&limit={}&namespace=0&format=json&redirects=resolve",
            self.endpoint,
            urlencoding::encode(name),
            self.max_results
        );

        // Clone values for the retry closure
        let client = Arc::clone(&self.client);
        let url_for_retry = url.clone();

        let response = with_retry(api_retry_config(), || {
            let client = Arc::clone(&client);
            let url = url_for_retry.clone();
            async move {
                let response = client
                    .get(&url)
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| {
                        SearchError::Network(format!("failed to query wikipedia: {}", e))
                    })?;
                if !response.status().is_success() {
                    return Err(SearchError::Api(response.status().as_u16()));
                }
                Ok(response)
            }
        })
        .await?;

        let reply: OpenSearchReply = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("failed to decode opensearch reply: {}", e)))?;

        let results = reply
            .1
            .iter()
            .zip(reply.3.iter())
            .map(|(title, url)| {
                SearchResultBuilder::new(title, url)
                    .query_type(self.classify(title))
                    .confidence(self.score(name, title))
                    .build()
            })
            .collect();

        Ok(SearchResponse::new(results, name))
    }
}

/// opensearch replies are positional: `[query, titles, descriptions, urls]`
#[derive(Debug, serde::Deserialize)]
#[allow(dead_code)]
struct OpenSearchReply(String, Vec<String>, Vec<String>, Vec<String>);

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> WikipediaSearch {
        WikipediaSearch::with_endpoint("http://127.0.0.1:0/api.php").unwrap()
    }

    #[test]
    fn test_classify_titles() {
        let backend = backend();

        assert_eq!(backend.classify("Dark (2017 TV series)"), QueryType::Series);
        assert_eq!(backend.classify("Dark (TV series)"), QueryType::Series);
        assert_eq!(
            backend.classify("Chernobyl (miniseries)"),
            QueryType::Miniseries
        );
        assert_eq!(backend.classify("Dark (film)"), QueryType::Other);
        assert_eq!(backend.classify("Dark"), QueryType::Other);
    }

    #[test]
    fn test_base_title_strips_series_parenthetical_only() {
        let backend = backend();

        assert_eq!(backend.base_title("Dark (2017 TV series)"), "Dark");
        assert_eq!(backend.base_title("Chernobyl (miniseries)"), "Chernobyl");
        assert_eq!(backend.base_title("Dark (film)"), "Dark (film)");
    }

    #[test]
    fn test_score_exact_and_inexact() {
        let backend = backend();

        assert!(backend.score("Dark", "Dark (2017 TV series)") > 0.999);
        assert!(backend.score("Chernobyl", "Chernobyl (miniseries)") > 0.999);
        assert!(backend.score("Dark", "Dark (film)") < 0.5);
    }

    #[test]
    fn test_decode_opensearch_reply() {
        let json = r#"["Dark",["Dark","Dark (2017 TV series)"],["",""],["https://en.wikipedia.org/wiki/Dark","https://en.wikipedia.org/wiki/Dark_(2017_TV_series)"]]"#;
        let reply: OpenSearchReply = serde_json::from_str(json).unwrap();

        assert_eq!(reply.1.len(), 2);
        assert_eq!(reply.3[1], "https://en.wikipedia.org/wiki/Dark_(2017_TV_series)");
    }

    #[tokio::test]
    async fn test_blank_query_short_circuits() {
        let backend = backend();

        let response = backend.search("   ").await.unwrap();
        assert!(response.is_empty());
    }
}
