//! HTTP client with rate limiting for stats.nba.com

use super::{parse_result_set, parse_scoreboard, MeasureType};
use crate::data::{merge_team_tables, AliasTable, Schedule};
use crate::error::ProjectionError;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const BASE_URL_TEAM_STATS: &str = "https://stats.nba.com/stats/leaguedashteamstats";
const BASE_URL_SCOREBOARD: &str = "https://stats.nba.com/stats/scoreboardv2";

/// stats.nba.com errors
#[derive(Debug, Error)]
pub enum StatsApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    BadStatus { status: u16, url: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<ProjectionError> for StatsApiError {
    fn from(e: ProjectionError) -> Self {
        StatsApiError::ParseError(e.to_string())
    }
}

impl From<StatsApiError> for ProjectionError {
    fn from(e: StatsApiError) -> Self {
        ProjectionError::DataUnavailable(e.to_string())
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct StatsApiConfig {
    /// Delay between requests in milliseconds
    pub delay_ms: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request; 1 means no automatic retry
    pub max_attempts: u32,
    /// User agent string
    pub user_agent: String,
}

impl Default for StatsApiConfig {
    fn default() -> Self {
        Self {
            delay_ms: 600,
            timeout_secs: 30,
            max_attempts: 1,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

/// stats.nba.com client
pub struct NbaStatsClient {
    client: reqwest::Client,
    config: StatsApiConfig,
    last_request: Arc<Mutex<Instant>>,
}

impl NbaStatsClient {
    pub fn new(config: StatsApiConfig) -> Result<Self, StatsApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (name, value) in [
            ("Referer", "https://www.nba.com/"),
            ("Origin", "https://www.nba.com"),
            ("x-nba-stats-origin", "stats"),
            ("x-nba-stats-token", "true"),
            ("Accept", "application/json, text/plain, */*"),
        ] {
            headers.insert(name, reqwest::header::HeaderValue::from_static(value));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Arc::new(Mutex::new(Instant::now() - Duration::from_secs(10))),
        })
    }

    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        let delay = Duration::from_millis(self.config.delay_ms);

        if elapsed < delay {
            tokio::time::sleep(delay - elapsed).await;
        }

        *last = Instant::now();
    }

    fn team_stats_url(&self, season: &str, measure: MeasureType) -> String {
        format!(
            "{}?Conference=&DateFrom=&DateTo=&Division=&GameScope=&GameSegment=&LastNGames=0\
             &LeagueID=00&Location=&MeasureType={}&Month=0&OpponentTeamID=0&Outcome=&PORound=0\
             &PaceAdjust=N&PerMode=PerGame&Period=0&PlayerExperience=&PlayerPosition=&PlusMinus=N\
             &Rank=N&Season={}&SeasonSegment=&SeasonType=Regular%20Season&ShotClockRange=\
             &StarterBench=&TeamID=0&TwoWay=0&VsConference=&VsDivision=",
            BASE_URL_TEAM_STATS,
            measure.as_param(),
            season
        )
    }

    fn scoreboard_url(&self, date: NaiveDate) -> String {
        format!(
            "{}?DayOffset=0&GameDate={}&LeagueID=00",
            BASE_URL_SCOREBOARD,
            date.format("%Y-%m-%d")
        )
    }

    async fn fetch_body(&self, url: &str) -> Result<String, StatsApiError> {
        let mut last_error = None;

        for attempt in 0..self.config.max_attempts.max(1) {
            self.wait_for_rate_limit().await;

            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text().await?);
                }
                Ok(response) => {
                    tracing::warn!(
                        "Request failed with status {} (attempt {}/{})",
                        response.status(),
                        attempt + 1,
                        self.config.max_attempts
                    );
                    last_error = Some(StatsApiError::BadStatus {
                        status: response.status().as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.config.max_attempts,
                        e
                    );
                    last_error = Some(StatsApiError::RequestFailed(e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            StatsApiError::ParseError(format!("no attempt made for {}", url))
        }))
    }

    /// One measure table of `leaguedashteamstats`
    pub async fn fetch_measure(
        &self,
        season: &str,
        measure: MeasureType,
    ) -> Result<Vec<Map<String, Value>>, StatsApiError> {
        let url = self.team_stats_url(season, measure);
        tracing::info!("Fetching {} team stats for {}", measure.as_param(), season);

        let body = self.fetch_body(&url).await?;
        Ok(parse_result_set(&body, Some("LeagueDashTeamStats"))?)
    }

    /// Base, Opponent and Advanced tables joined per team
    pub async fn fetch_team_records(
        &self,
        season: &str,
    ) -> Result<Vec<Map<String, Value>>, StatsApiError> {
        let offense = self.fetch_measure(season, MeasureType::Base).await?;
        let opponent = self.fetch_measure(season, MeasureType::Opponent).await?;
        let advanced = self.fetch_measure(season, MeasureType::Advanced).await?;

        Ok(merge_team_tables(
            &AliasTable::default(),
            &offense,
            &opponent,
            &advanced,
        ))
    }

    /// Games scheduled on `date`
    pub async fn fetch_schedule(&self, date: NaiveDate) -> Result<Schedule, StatsApiError> {
        let url = self.scoreboard_url(date);
        tracing::info!("Fetching scoreboard: {}", url);

        let body = self.fetch_body(&url).await?;
        Ok(parse_scoreboard(&body, date)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = StatsApiConfig::default();
        assert_eq!(config.delay_ms, 600);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_team_stats_url() {
        let client = NbaStatsClient::new(StatsApiConfig::default()).unwrap();
        let url = client.team_stats_url("2024-25", MeasureType::Opponent);
        assert!(url.starts_with("https://stats.nba.com/stats/leaguedashteamstats?"));
        assert!(url.contains("MeasureType=Opponent"));
        assert!(url.contains("Season=2024-25"));
        assert!(url.contains("PerMode=PerGame"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_scoreboard_url() {
        let client = NbaStatsClient::new(StatsApiConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(
            client.scoreboard_url(date),
            "https://stats.nba.com/stats/scoreboardv2?DayOffset=0&GameDate=2025-01-05&LeagueID=00"
        );
    }
}
