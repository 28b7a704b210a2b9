//! Disambiguation: a free-text series name to exactly one confirmed match.
//!
//! [`DisambiguationResolver`] drives the search → match-check → (optional
//! interactive choice) → re-check loop. The operator prompt is the only
//! suspension point and sits behind the [`Prompter`] trait; the resolver
//! owns parsing and validating the selection, so no sequence access happens
//! on unchecked input.

mod console;

pub mod mock;

pub use console::ConsolePrompter;
pub use mock::ScriptedPrompter;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{ConfirmedMatch, SearchResult};
use crate::search::{SearchClient, SearchError};

/// Errors that can occur during resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Search returned no candidates to choose from
    #[error("no results found for '{0}'")]
    NoResults(String),

    /// Operator input during manual disambiguation was not an integer
    #[error("selection '{0}' is not an integer")]
    NonIntegerSelection(String),

    /// Operator selection was outside the candidate range
    #[error("selection {choice} is out of range, expected 0..{len}")]
    InvalidSelection { choice: i64, len: usize },

    /// The chosen candidate did not pass the authoritativeness re-check
    #[error("selected candidate '{0}' could not be confirmed as a match")]
    UnconfirmedSelection(String),

    /// The operator interrupted resolution or closed stdin
    #[error("resolution aborted by operator")]
    AbortedByUser,

    /// No selection arrived within the configured timeout
    #[error("no selection received within {0} seconds")]
    PromptTimeout(u64),

    /// Search backend failure
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Terminal I/O failure while prompting
    #[error("prompt I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    /// Process exit code for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::NoResults(_) => 2,
            ResolveError::NonIntegerSelection(_) => 3,
            ResolveError::InvalidSelection { .. } => 4,
            ResolveError::UnconfirmedSelection(_) => 5,
            ResolveError::AbortedByUser => 6,
            ResolveError::PromptTimeout(_) => 7,
            ResolveError::Search(_) => 8,
            ResolveError::Io(_) => 10,
        }
    }
}

/// The single suspension point of resolution
///
/// Implementations present the ordered candidates to the operator and return
/// one raw line of input. Parsing and validation stay in the resolver.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn read_selection(&self, candidates: &[SearchResult]) -> Result<String, ResolveError>;
}

#[async_trait]
impl<P: Prompter + ?Sized> Prompter for Arc<P> {
    async fn read_selection(&self, candidates: &[SearchResult]) -> Result<String, ResolveError> {
        (**self).read_selection(candidates).await
    }
}

/// Resolves a series name into exactly one confirmed match, involving the
/// operator only when automatic resolution is impossible
pub struct DisambiguationResolver<C, P> {
    client: C,
    prompter: P,
}

impl<C: SearchClient, P: Prompter> DisambiguationResolver<C, P> {
    pub fn new(client: C, prompter: P) -> Self {
        Self { client, prompter }
    }

    /// Resolve `name` to one confirmed match or fail explicitly
    pub async fn resolve(&self, name: &str) -> Result<ConfirmedMatch, ResolveError> {
        info!("searching for {}", name);
        let response = self.client.search(name).await?;
        let results = response.results;

        if let Some(found) = self.client.find_authoritative(&results) {
            debug!("authoritative match: {}", found.title());
            return Ok(found);
        }

        if results.is_empty() {
            return Err(ResolveError::NoResults(name.to_string()));
        }

        let raw = self.prompter.read_selection(&results).await?;
        let choice = parse_selection(&raw, results.len())?;
        let picked = &results[choice];
        debug!("operator chose: {}", picked.title);

        self.client
            .find_authoritative(std::slice::from_ref(picked))
            .ok_or_else(|| ResolveError::UnconfirmedSelection(picked.title.clone()))
    }
}

/// Validated parse of the operator's selection, before any sequence access
fn parse_selection(raw: &str, len: usize) -> Result<usize, ResolveError> {
    let trimmed = raw.trim();
    let choice: i64 = trimmed
        .parse()
        .map_err(|_| ResolveError::NonIntegerSelection(trimmed.to_string()))?;
    if choice < 0 || choice as usize >= len {
        return Err(ResolveError::InvalidSelection { choice, len });
    }
    Ok(choice as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_accepts_in_range() {
        assert_eq!(parse_selection("0", 3).unwrap(), 0);
        assert_eq!(parse_selection(" 2 \n", 3).unwrap(), 2);
    }

    #[test]
    fn test_parse_selection_rejects_non_integer() {
        let err = parse_selection("abc", 3).unwrap_err();
        assert!(matches!(err, ResolveError::NonIntegerSelection(ref s) if s == "abc"));
    }

    #[test]
    fn test_parse_selection_rejects_out_of_range() {
        let err = parse_selection("3", 3).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidSelection { choice: 3, len: 3 }));

        let err = parse_selection("-1", 3).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidSelection { choice: -1, len: 3 }));
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            ResolveError::NoResults("x".into()),
            ResolveError::NonIntegerSelection("x".into()),
            ResolveError::InvalidSelection { choice: 9, len: 2 },
            ResolveError::UnconfirmedSelection("x".into()),
            ResolveError::AbortedByUser,
            ResolveError::PromptTimeout(30),
            ResolveError::Search(SearchError::Api(500)),
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
        assert!(!codes.contains(&1));
    }
}
