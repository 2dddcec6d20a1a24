//! Team profile resolution from loosely structured records
//!
//! Stats sources disagree on field names (`FG3M`, `fg3m`, `scored_rate`, ...)
//! and some nest secondary tables under a wrapper key. Each logical field has
//! an ordered alias list; the first alias present wins. Top-level keys are
//! searched before wrapper objects, and wrappers are searched one level deep.
//!
//! Fallback policy:
//! - `scored_rate` has no fallback. Missing it rejects the team.
//! - `allowed_rate` and `pace` fall back to the configured defaults only when
//!   the source does not report that field at all (see [`SourceCoverage`]).
//!   A source that does report the field but has no value for this team
//!   rejects the team.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{validate_non_negative, ProjectionError};
use crate::models::TeamStatProfile;

/// Logical fields of a team stats record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    TeamId,
    TeamName,
    ScoredRate,
    AllowedRate,
    Pace,
}

impl StatField {
    pub fn name(&self) -> &'static str {
        match self {
            StatField::TeamId => "team_id",
            StatField::TeamName => "team_name",
            StatField::ScoredRate => "scored_rate",
            StatField::AllowedRate => "allowed_rate",
            StatField::Pace => "pace",
        }
    }
}

/// Ordered alias lists per logical field
#[derive(Debug, Clone)]
pub struct AliasTable {
    pub team_id: Vec<&'static str>,
    pub team_name: Vec<&'static str>,
    pub scored_rate: Vec<&'static str>,
    pub allowed_rate: Vec<&'static str>,
    pub pace: Vec<&'static str>,
    /// Keys whose object values are searched one level deep
    pub wrappers: Vec<&'static str>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            team_id: vec!["TEAM_ID", "team_id", "teamId", "id"],
            team_name: vec!["TEAM_NAME", "team_name", "teamName", "name"],
            scored_rate: vec!["FG3M", "fg3m", "scored_rate", "threes_made", "3PM"],
            allowed_rate: vec![
                "OPP_FG3M",
                "opp_fg3m",
                "allowed_rate",
                "threes_allowed",
                "OPP_3PM",
            ],
            pace: vec!["PACE", "pace", "possessions"],
            wrappers: vec!["stats", "offense", "opponent", "defense", "advanced"],
        }
    }
}

impl AliasTable {
    pub fn aliases(&self, field: StatField) -> &[&'static str] {
        match field {
            StatField::TeamId => &self.team_id,
            StatField::TeamName => &self.team_name,
            StatField::ScoredRate => &self.scored_rate,
            StatField::AllowedRate => &self.allowed_rate,
            StatField::Pace => &self.pace,
        }
    }

    /// First alias of `field` found among `names` (e.g. CSV headers)
    pub fn find_column<'n, I>(&self, field: StatField, names: I) -> Option<&'n str>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        self.aliases(field)
            .iter()
            .find_map(|alias| names.iter().copied().find(|name| name == alias))
    }

    /// Whether any alias of `field` is present as a key, null or not
    pub fn has_field(&self, field: StatField, record: &Map<String, Value>) -> bool {
        let aliases = self.aliases(field);
        let present = |map: &Map<String, Value>| aliases.iter().any(|a| map.contains_key(*a));

        present(record)
            || self
                .wrappers
                .iter()
                .filter_map(|w| record.get(*w).and_then(Value::as_object))
                .any(present)
    }

    /// First non-null value of `field` in `record`, top level before wrappers
    pub fn lookup<'r>(&self, field: StatField, record: &'r Map<String, Value>) -> Option<&'r Value> {
        let aliases = self.aliases(field);

        let direct = aliases
            .iter()
            .find_map(|alias| record.get(*alias).filter(|v| !v.is_null()));
        if direct.is_some() {
            return direct;
        }

        self.wrappers
            .iter()
            .filter_map(|w| record.get(*w).and_then(Value::as_object))
            .find_map(|inner| {
                aliases
                    .iter()
                    .find_map(|alias| inner.get(*alias).filter(|v| !v.is_null()))
            })
    }
}

/// Which optional fields a source actually reports
///
/// `true` means the source is authoritative for that field: a team without a
/// value is rejected. `false` means the source never carries the field and the
/// configured fallback applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCoverage {
    pub allowed_rate: bool,
    pub pace: bool,
}

impl SourceCoverage {
    pub const FULL: SourceCoverage = SourceCoverage {
        allowed_rate: true,
        pace: true,
    };
    pub const OFFENSE_ONLY: SourceCoverage = SourceCoverage {
        allowed_rate: false,
        pace: false,
    };
}

impl SourceCoverage {
    /// A field is reported when any record carries one of its aliases,
    /// even with a null value (an empty CSV cell).
    pub fn detect(aliases: &AliasTable, records: &[Map<String, Value>]) -> Self {
        Self {
            allowed_rate: records
                .iter()
                .any(|r| aliases.has_field(StatField::AllowedRate, r)),
            pace: records.iter().any(|r| aliases.has_field(StatField::Pace, r)),
        }
    }
}

/// Turns raw records into validated profiles
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    pub aliases: AliasTable,
    pub fallback_allowed_rate: f64,
    pub fallback_pace: f64,
}

impl Default for ProfileResolver {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ProfileResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            aliases: AliasTable::default(),
            fallback_allowed_rate: config.fallback_allowed_rate,
            fallback_pace: config.fallback_pace,
        }
    }

    /// Best-effort label for error messages, before the record is resolved
    pub fn team_label(&self, record: &Map<String, Value>) -> String {
        if let Some(name) = self
            .aliases
            .lookup(StatField::TeamName, record)
            .and_then(Value::as_str)
        {
            return name.to_string();
        }
        match self.aliases.lookup(StatField::TeamId, record) {
            Some(id) => format!("#{}", value_to_string(id)),
            None => "<unknown team>".to_string(),
        }
    }

    pub fn resolve(
        &self,
        record: &Map<String, Value>,
        coverage: SourceCoverage,
    ) -> Result<TeamStatProfile, ProjectionError> {
        let label = self.team_label(record);

        let team_id = self
            .aliases
            .lookup(StatField::TeamId, record)
            .and_then(value_to_u32)
            .ok_or_else(|| ProjectionError::missing_field(&label, StatField::TeamId.name()))?;

        let team_name = self
            .aliases
            .lookup(StatField::TeamName, record)
            .map(value_to_string)
            .unwrap_or_else(|| team_id.to_string());

        let scored_rate = self
            .number(StatField::ScoredRate, record, &label)?
            .ok_or_else(|| ProjectionError::missing_field(&label, StatField::ScoredRate.name()))?;

        let allowed_rate = self.with_fallback(
            StatField::AllowedRate,
            record,
            &label,
            coverage.allowed_rate,
            self.fallback_allowed_rate,
        )?;

        let pace = self.with_fallback(
            StatField::Pace,
            record,
            &label,
            coverage.pace,
            self.fallback_pace,
        )?;

        for (field, value) in [
            (StatField::ScoredRate, scored_rate),
            (StatField::AllowedRate, allowed_rate),
            (StatField::Pace, pace),
        ] {
            validate_non_negative(&format!("{} of {}", field.name(), label), value)?;
        }

        Ok(TeamStatProfile {
            team_id,
            team_name,
            scored_rate,
            allowed_rate,
            pace,
        })
    }

    fn with_fallback(
        &self,
        field: StatField,
        record: &Map<String, Value>,
        label: &str,
        reported: bool,
        fallback: f64,
    ) -> Result<f64, ProjectionError> {
        match self.number(field, record, label)? {
            Some(v) => Ok(v),
            None if reported => Err(ProjectionError::missing_field(label, field.name())),
            None => {
                debug!("{}: no {} in source, using {}", label, field.name(), fallback);
                Ok(fallback)
            }
        }
    }

    fn number(
        &self,
        field: StatField,
        record: &Map<String, Value>,
        label: &str,
    ) -> Result<Option<f64>, ProjectionError> {
        match self.aliases.lookup(field, record) {
            None => Ok(None),
            Some(value) => value_to_f64(value).map(Some).ok_or_else(|| {
                ProjectionError::InvalidInput(format!(
                    "{} of {} is not a number: {}",
                    field.name(),
                    label,
                    value
                ))
            }),
        }
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub(crate) fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
