//! Episode-table extraction from article HTML.
//!
//! Series articles list episodes in `table.wikiepisodetable` tables, one
//! table per season, one `tr.vevent` row per episode. Miniseries articles
//! carry a single table; the walk is the same either way.

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

use super::PipelineError;
use crate::models::{ConfirmedMatch, Episode, Season, SeriesRecord};

pub(super) fn parse_series(
    html: &str,
    matched: &ConfirmedMatch,
    miniseries: bool,
) -> Result<SeriesRecord, PipelineError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table.wikiepisodetable")
        .map_err(|e| PipelineError::Parse(format!("bad table selector: {}", e)))?;
    let row_selector = Selector::parse("tr.vevent")
        .map_err(|e| PipelineError::Parse(format!("bad row selector: {}", e)))?;

    let mut seasons = Vec::new();
    for table in document.select(&table_selector) {
        let episodes: Vec<Episode> = table
            .select(&row_selector)
            .filter_map(|row| parse_episode_row(&row))
            .collect();
        if episodes.is_empty() {
            continue;
        }
        seasons.push(Season::new(seasons.len() as u32 + 1, episodes));
    }

    if seasons.is_empty() {
        return Err(PipelineError::Parse(format!(
            "no episode tables found in '{}'",
            matched.title()
        )));
    }

    Ok(SeriesRecord {
        title: matched.title().to_string(),
        url: matched.url().to_string(),
        query_type: matched.query_type(),
        miniseries,
        seasons,
        fetched_at: Utc::now(),
    })
}

/// Parse one episode row, skipping rows that don't carry a number and title
fn parse_episode_row(row: &ElementRef) -> Option<Episode> {
    let number_selector = Selector::parse("th").ok()?;
    let title_selector = Selector::parse("td.summary").ok()?;

    let number_text = row.select(&number_selector).next()?.text().collect::<String>();
    let number = first_integer(&number_text)?;

    let title = row
        .select(&title_selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .trim_matches('"')
        .to_string();
    if title.is_empty() {
        return None;
    }

    let mut episode = Episode::new(number, title);
    if let Some(date) = air_date(row) {
        episode = episode.air_date(date);
    }
    Some(episode)
}

fn first_integer(text: &str) -> Option<u32> {
    let re = regex::Regex::new(r"\d+").ok()?;
    re.find(text)?.as_str().parse().ok()
}

/// Air dates hide in `(YYYY-MM-DD)` sort keys inside the row
fn air_date(row: &ElementRef) -> Option<String> {
    let re = regex::Regex::new(r"(\d{4}-\d{2}-\d{2})").ok()?;
    let text = row.text().collect::<String>();
    re.captures(&text)?
        .get(1)
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QueryType, SearchResultBuilder};

    const SAMPLE: &str = r#"<html><body>
<table class="wikiepisodetable">
 <tr><th>No.</th><th>Title</th><th>Original air date</th></tr>
 <tr class="vevent"><th scope="row">1</th><td class="summary">"Secrets"</td>
  <td>December 1, 2017<span style="display:none"> (2017-12-01)</span></td></tr>
 <tr class="vevent"><th scope="row">2</th><td class="summary">"Lies"</td>
  <td>December 1, 2017<span style="display:none"> (2017-12-01)</span></td></tr>
</table>
<table class="wikiepisodetable">
 <tr class="vevent"><th scope="row">11</th><td class="summary">"Beginnings and Endings"</td>
  <td>June 21, 2019<span style="display:none"> (2019-06-21)</span></td></tr>
</table>
</body></html>"#;

    fn matched() -> ConfirmedMatch {
        ConfirmedMatch::new(
            SearchResultBuilder::new(
                "Dark (2017 TV series)",
                "https://en.wikipedia.org/wiki/Dark_(2017_TV_series)",
            )
            .query_type(QueryType::Series)
            .confidence(1.0)
            .build(),
        )
    }

    #[test]
    fn test_parses_one_season_per_table() {
        let record = parse_series(SAMPLE, &matched(), false).unwrap();

        assert_eq!(record.season_count(), 2);
        assert_eq!(record.episode_count(), 3);
        assert_eq!(record.seasons[0].number, 1);
        assert_eq!(record.seasons[1].number, 2);
        assert_eq!(record.seasons[0].episodes[0].title, "Secrets");
        assert_eq!(record.seasons[1].episodes[0].number, 11);
        assert_eq!(
            record.seasons[1].episodes[0].air_date.as_deref(),
            Some("2019-06-21")
        );
    }

    #[test]
    fn test_record_carries_match_identity() {
        let record = parse_series(SAMPLE, &matched(), false).unwrap();

        assert_eq!(record.title, "Dark (2017 TV series)");
        assert_eq!(record.query_type, QueryType::Series);
        assert!(!record.miniseries);
    }

    #[test]
    fn test_no_episode_tables_is_a_parse_error() {
        let err = parse_series("<html><body><p>stub</p></body></html>", &matched(), false)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn test_header_rows_are_skipped() {
        let record = parse_series(SAMPLE, &matched(), false).unwrap();
        // header row has no vevent class and no summary cell
        assert_eq!(record.seasons[0].episodes.len(), 2);
    }
}
