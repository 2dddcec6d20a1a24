//! stats.nba.com adapter
//!
//! The endpoints return tabular JSON:
//!
//! ```json
//! { "resultSets": [ { "name": "LeagueDashTeamStats",
//!                     "headers": ["TEAM_ID", "TEAM_NAME", "FG3M", ...],
//!                     "rowSet": [[1610612737, "Atlanta Hawks", 13.1, ...], ...] } ] }
//! ```
//!
//! Parsing lives here and is always compiled. The HTTP client is behind the
//! `stats-api` feature.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "stats-api")]
//! # async fn run() -> anyhow::Result<()> {
//! use nba3p::stats_api::{NbaStatsClient, StatsApiConfig};
//!
//! let client = NbaStatsClient::new(StatsApiConfig::default())?;
//! let records = client.fetch_team_records("2024-25").await?;
//! println!("Fetched {} teams", records.len());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "stats-api")]
mod client;

#[cfg(feature = "stats-api")]
pub use client::{NbaStatsClient, StatsApiConfig, StatsApiError};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::data::Schedule;
use crate::error::ProjectionError;

/// Measure types requested from `leaguedashteamstats`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureType {
    /// Team's own per-game stats (FG3M)
    Base,
    /// Stats allowed to opponents (OPP_FG3M)
    Opponent,
    /// Pace and ratings (PACE)
    Advanced,
}

impl MeasureType {
    pub fn as_param(&self) -> &'static str {
        match self {
            MeasureType::Base => "Base",
            MeasureType::Opponent => "Opponent",
            MeasureType::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", alias = "resultSet")]
    result_sets: ResultSets,
}

// Most endpoints return an array, a few a single object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultSets {
    Many(Vec<ResultSet>),
    One(ResultSet),
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

/// Rows of the named result set as header-keyed records
///
/// `name` of `None` takes the first set.
pub fn parse_result_set(
    body: &str,
    name: Option<&str>,
) -> Result<Vec<Map<String, Value>>, ProjectionError> {
    let response: StatsResponse = serde_json::from_str(body)?;
    let sets = match response.result_sets {
        ResultSets::Many(sets) => sets,
        ResultSets::One(set) => vec![set],
    };

    let set = match name {
        Some(name) => sets.into_iter().find(|s| s.name == name),
        None => sets.into_iter().next(),
    }
    .ok_or_else(|| {
        ProjectionError::DataUnavailable(format!(
            "result set {} not in response",
            name.unwrap_or("<first>")
        ))
    })?;

    Ok(set
        .row_set
        .into_iter()
        .map(|row| set.headers.iter().cloned().zip(row).collect())
        .collect())
}

/// Games from a `scoreboardv2` response
pub fn parse_scoreboard(body: &str, date: NaiveDate) -> Result<Schedule, ProjectionError> {
    let rows = parse_result_set(body, Some("GameHeader"))?;
    Ok(Schedule::from_records(date, &rows))
}

/// Season string for a calendar date: October starts a new season
pub fn season_for(date: NaiveDate) -> String {
    let start_year = if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{:02}", start_year, (start_year + 1) % 100)
}
