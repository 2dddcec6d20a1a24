//! Today's games

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::warn;

use super::aliases::value_to_u32;
use crate::error::ProjectionError;
use crate::models::ScheduledGame;
use crate::provider::ScheduleProvider;

const HOME_ALIASES: [&str; 3] = ["HOME_TEAM_ID", "home_id", "home_team_id"];
const AWAY_ALIASES: [&str; 4] = ["VISITOR_TEAM_ID", "AWAY_TEAM_ID", "away_id", "away_team_id"];
const GAME_ID_ALIASES: [&str; 2] = ["GAME_ID", "game_id"];

/// Games for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub date: NaiveDate,
    pub scraped_at: String,
    pub games: Vec<ScheduledGame>,
}

impl Schedule {
    pub fn new(date: NaiveDate, games: Vec<ScheduledGame>) -> Self {
        Self {
            date,
            scraped_at: Utc::now().to_rfc3339(),
            games,
        }
    }

    /// Build from loosely named rows; rows without both team ids are skipped
    pub fn from_records(date: NaiveDate, records: &[Map<String, Value>]) -> Self {
        let mut games: Vec<ScheduledGame> = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let home = first_of(record, &HOME_ALIASES).and_then(value_to_u32);
            let away = first_of(record, &AWAY_ALIASES).and_then(value_to_u32);

            match (home, away) {
                (Some(home_id), Some(away_id)) => {
                    let game_id = first_of(record, &GAME_ID_ALIASES).map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    });
                    if games
                        .iter()
                        .any(|g| g.home_id == home_id && g.away_id == away_id)
                    {
                        continue;
                    }
                    games.push(ScheduledGame {
                        game_id,
                        home_id,
                        away_id,
                    });
                }
                _ => warn!("Schedule row {} has no home/away team ids, skipping", i),
            }
        }

        Self::new(date, games)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ProjectionError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ProjectionError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl ScheduleProvider for Schedule {
    fn get_todays_matchups(&self) -> Result<Vec<ScheduledGame>, ProjectionError> {
        Ok(self.games.clone())
    }
}

fn first_of<'r>(record: &'r Map<String, Value>, aliases: &[&str]) -> Option<&'r Value> {
    aliases
        .iter()
        .find_map(|a| record.get(*a).filter(|v| !v.is_null()))
}
