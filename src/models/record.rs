//! Persisted season/episode structure of a parsed series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::QueryType;

/// One episode row extracted from an episode table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode number as listed in the table
    pub number: u32,

    /// Episode title, quotes stripped
    pub title: String,

    /// Original air date (ISO format) when the table carries one
    pub air_date: Option<String>,
}

impl Episode {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            air_date: None,
        }
    }

    /// Set the air date
    pub fn air_date(mut self, date: impl Into<String>) -> Self {
        self.air_date = Some(date.into());
        self
    }
}

/// One season and its episodes, in broadcast order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    /// 1-based season number
    pub number: u32,

    /// Episodes in table order
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn new(number: u32, episodes: Vec<Episode>) -> Self {
        Self { number, episodes }
    }
}

/// Full parsed output for one series, written to disk as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Series title from the confirmed article
    pub title: String,

    /// Article URL the structure was parsed from
    pub url: String,

    /// Series vs. miniseries classification
    pub query_type: QueryType,

    /// Whether the article was parsed as a miniseries
    pub miniseries: bool,

    /// Seasons in article order
    pub seasons: Vec<Season>,

    /// When the article was fetched
    pub fetched_at: DateTime<Utc>,
}

impl SeriesRecord {
    /// Total number of episodes across all seasons
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }

    /// Number of seasons
    pub fn season_count(&self) -> usize {
        self.seasons.len()
    }
}
