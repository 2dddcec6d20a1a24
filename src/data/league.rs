//! Resolved league stats set
//!
//! Holds every team that resolved cleanly plus the per-team errors for those
//! that did not, so a lookup for a rejected team reports why instead of
//! a generic "not found".

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use super::aliases::{value_to_u32, AliasTable, ProfileResolver, SourceCoverage, StatField};
use crate::error::ProjectionError;
use crate::models::{LeagueContext, TeamRef, TeamStatProfile};
use crate::provider::StatsProvider;

/// Default age after which a loaded table should be refreshed
pub const DEFAULT_MAX_AGE_SECS: i64 = 3600;

/// A team record that failed resolution
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedTeam {
    pub team_id: Option<u32>,
    pub label: String,
    pub error: ProjectionError,
}

/// All team profiles from one load
#[derive(Debug, Clone)]
pub struct LeagueTable {
    profiles: Vec<TeamStatProfile>,
    rejected: Vec<RejectedTeam>,
    loaded_at: DateTime<Utc>,
}

impl LeagueTable {
    pub fn from_profiles(profiles: Vec<TeamStatProfile>) -> Self {
        Self {
            profiles,
            rejected: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Resolve raw records; failures are kept per team, never fatal
    pub fn from_records(
        records: &[Map<String, Value>],
        resolver: &ProfileResolver,
        coverage: SourceCoverage,
    ) -> Self {
        let mut profiles: Vec<TeamStatProfile> = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();

        for record in records {
            match resolver.resolve(record, coverage) {
                Ok(profile) => {
                    if !seen.insert(profile.team_id) {
                        warn!(
                            "Duplicate record for team {} ({}), keeping the first",
                            profile.team_id, profile.team_name
                        );
                        continue;
                    }
                    profiles.push(profile);
                }
                Err(e) => {
                    let label = resolver.team_label(record);
                    warn!("Rejected team {}: {}", label, e);
                    rejected.push(RejectedTeam {
                        team_id: resolver
                            .aliases
                            .lookup(StatField::TeamId, record)
                            .and_then(value_to_u32),
                        label,
                        error: e,
                    });
                }
            }
        }

        info!(
            "Loaded {} team profiles ({} rejected)",
            profiles.len(),
            rejected.len()
        );

        Self {
            profiles,
            rejected,
            loaded_at: Utc::now(),
        }
    }

    pub fn profiles(&self) -> &[TeamStatProfile] {
        &self.profiles
    }

    pub fn rejected(&self) -> &[RejectedTeam] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// League average pace over the resolved teams
    pub fn league_context(&self) -> Result<LeagueContext, ProjectionError> {
        LeagueContext::from_profiles(&self.profiles)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn with_loaded_at(mut self, loaded_at: DateTime<Utc>) -> Self {
        self.loaded_at = loaded_at;
        self
    }

    pub fn is_stale(&self, max_age: Duration) -> bool {
        Utc::now() - self.loaded_at > max_age
    }

    /// Find a team by id, exact name, or unique trailing word(s) ("Celtics")
    pub fn find(&self, team: &TeamRef) -> Option<&TeamStatProfile> {
        match team {
            TeamRef::Id(id) => self.profiles.iter().find(|p| p.team_id == *id),
            TeamRef::Name(name) => match_by_name(&self.profiles, |p| p.team_name.as_str(), name),
        }
    }

    fn find_rejected(&self, team: &TeamRef) -> Option<&RejectedTeam> {
        match team {
            TeamRef::Id(id) => self.rejected.iter().find(|r| r.team_id == Some(*id)),
            TeamRef::Name(name) => match_by_name(&self.rejected, |r| r.label.as_str(), name),
        }
    }
}

/// Exact case-insensitive name first, then a unique whole-word suffix.
/// A blank name matches nothing.
fn match_by_name<'a, T>(
    items: &'a [T],
    name_of: impl Fn(&T) -> &str,
    name: &str,
) -> Option<&'a T> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    if let Some(item) = items
        .iter()
        .find(|item| name_of(*item).to_lowercase() == wanted)
    {
        return Some(item);
    }

    let suffix = format!(" {}", wanted);
    let mut by_suffix = items
        .iter()
        .filter(|item| name_of(*item).to_lowercase().ends_with(&suffix));
    match (by_suffix.next(), by_suffix.next()) {
        (Some(item), None) => Some(item),
        _ => None,
    }
}

impl StatsProvider for LeagueTable {
    fn get_team_stats(&self, team: &TeamRef) -> Result<TeamStatProfile, ProjectionError> {
        if let Some(profile) = self.find(team) {
            return Ok(profile.clone());
        }
        if let Some(rejected) = self.find_rejected(team) {
            return Err(rejected.error.clone());
        }
        Err(ProjectionError::DataUnavailable(format!(
            "no stats for team {}",
            team
        )))
    }
}

/// Join offense, opponent and advanced tables on team id
///
/// The offense table drives the join: a team missing from it is not
/// fabricated from the other two. Opponent and advanced fields are nested
/// under `opponent` / `advanced` so their column names cannot shadow the
/// offense columns.
pub fn merge_team_tables(
    aliases: &AliasTable,
    offense: &[Map<String, Value>],
    opponent: &[Map<String, Value>],
    advanced: &[Map<String, Value>],
) -> Vec<Map<String, Value>> {
    let index = |rows: &[Map<String, Value>]| -> HashMap<String, Map<String, Value>> {
        rows.iter()
            .filter_map(|row| {
                let id = aliases.lookup(StatField::TeamId, row)?;
                Some((id_key(id), row.clone()))
            })
            .collect()
    };
    let opponent = index(opponent);
    let advanced = index(advanced);

    let merged: Vec<Map<String, Value>> = offense
        .iter()
        .map(|row| {
            let mut record = row.clone();
            if let Some(id) = aliases.lookup(StatField::TeamId, row).map(id_key) {
                if let Some(opp) = opponent.get(&id) {
                    record.insert("opponent".to_string(), Value::Object(opp.clone()));
                }
                if let Some(adv) = advanced.get(&id) {
                    record.insert("advanced".to_string(), Value::Object(adv.clone()));
                }
            }
            record
        })
        .collect();

    debug!(
        "Merged {} offense rows with {} opponent and {} advanced rows",
        offense.len(),
        opponent.len(),
        advanced.len()
    );

    merged
}

fn id_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}
