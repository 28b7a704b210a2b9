//! Scripted prompter for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::SearchResult;
use crate::resolve::{Prompter, ResolveError};

/// A prompter that replays scripted input lines and records every prompt.
///
/// Running out of scripted lines behaves like the operator closing stdin.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    lines: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPrompter {
    /// Create a prompter with no scripted input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one line of operator input.
    pub fn push_line(&self, line: impl Into<String>) {
        self.lines.lock().unwrap().push_back(line.into());
    }

    /// How many times the resolver prompted.
    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Candidate titles shown at each prompt, in presentation order.
    pub fn prompted_titles(&self) -> Vec<Vec<String>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn read_selection(&self, candidates: &[SearchResult]) -> Result<String, ResolveError> {
        self.prompts
            .lock()
            .unwrap()
            .push(candidates.iter().map(|c| c.title.clone()).collect());
        self.lines
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ResolveError::AbortedByUser)
    }
}
