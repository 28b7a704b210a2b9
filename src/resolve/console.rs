//! Console prompter: the blocking stdin read behind manual disambiguation.

use async_trait::async_trait;
use std::io::Write;
use std::time::Duration;

use crate::models::SearchResult;
use crate::resolve::{Prompter, ResolveError};
use crate::ui;

/// Prompter that lists candidates on stdout and reads one line from stdin
///
/// The read honors an optional timeout and the operator interrupt (Ctrl-C);
/// stdin closing counts as abandonment. Without a timeout the read blocks
/// indefinitely.
pub struct ConsolePrompter {
    timeout: Option<Duration>,
}

impl ConsolePrompter {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn print_candidates(&self, candidates: &[SearchResult]) -> Result<(), std::io::Error> {
        let color = ui::use_color();
        let mut out = std::io::stdout().lock();
        for (index, candidate) in candidates.iter().enumerate() {
            writeln!(out, "{}", ui::candidate_line(index, &candidate.title, color))?;
        }
        write!(out, "Found multiple results, please choose the correct one: ")?;
        out.flush()
    }

    async fn read_line() -> Result<String, ResolveError> {
        let outcome = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            let read = std::io::stdin().read_line(&mut line)?;
            Ok::<_, std::io::Error>((read, line))
        })
        .await
        .map_err(std::io::Error::other)?;

        let (read, line) = outcome?;
        if read == 0 {
            // stdin closed underneath us
            return Err(ResolveError::AbortedByUser);
        }
        Ok(line)
    }
}

#[async_trait]
impl Prompter for ConsolePrompter {
    async fn read_selection(&self, candidates: &[SearchResult]) -> Result<String, ResolveError> {
        self.print_candidates(candidates)?;

        // The abandoned blocking read stays parked until the process exits,
        // which happens immediately on either abort path.
        let read = Self::read_line();
        tokio::pin!(read);

        tokio::select! {
            line = &mut read => line,
            _ = tokio::signal::ctrl_c() => Err(ResolveError::AbortedByUser),
            _ = sleep_or_forever(self.timeout) => Err(ResolveError::PromptTimeout(
                self.timeout.unwrap_or_default().as_secs(),
            )),
        }
    }
}

async fn sleep_or_forever(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending().await,
    }
}
