use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{validate_non_negative, ProjectionError};

/// Per-team three-point rates, resolved from a stats source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatProfile {
    pub team_id: u32,
    pub team_name: String,
    /// Threes made per game
    pub scored_rate: f64,
    /// Threes allowed to opponents per game
    pub allowed_rate: f64,
    /// Possessions per game
    pub pace: f64,
}

impl TeamStatProfile {
    pub fn new(
        team_id: u32,
        team_name: impl Into<String>,
        scored_rate: f64,
        allowed_rate: f64,
        pace: f64,
    ) -> Result<Self, ProjectionError> {
        let profile = Self {
            team_id,
            team_name: team_name.into(),
            scored_rate,
            allowed_rate,
            pace,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// All rates must be non-negative finite numbers before entering the engine
    pub fn validate(&self) -> Result<(), ProjectionError> {
        validate_non_negative("scored_rate", self.scored_rate)?;
        validate_non_negative("allowed_rate", self.allowed_rate)?;
        validate_non_negative("pace", self.pace)?;
        Ok(())
    }
}

/// League-wide normalization inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueContext {
    pub average_pace: f64,
}

impl LeagueContext {
    /// Mean pace over the given profiles. An empty set is `DivisionUndefined`.
    pub fn from_profiles<'a, I>(profiles: I) -> Result<Self, ProjectionError>
    where
        I: IntoIterator<Item = &'a TeamStatProfile>,
    {
        let (sum, count) = profiles
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), p| (sum + p.pace, count + 1));

        if count == 0 {
            return Err(ProjectionError::DivisionUndefined(
                "cannot average pace over zero teams".to_string(),
            ));
        }

        Ok(Self {
            average_pace: sum / count as f64,
        })
    }
}

/// Home/away pairing for a single evaluation
#[derive(Debug, Clone)]
pub struct Matchup {
    pub home: TeamStatProfile,
    pub away: TeamStatProfile,
}

impl Matchup {
    pub fn new(home: TeamStatProfile, away: TeamStatProfile) -> Self {
        Self { home, away }
    }

    /// "Away @ Home"
    pub fn label(&self) -> String {
        format!("{} @ {}", self.away.team_name, self.home.team_name)
    }
}

/// Player categories that can be flagged as absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceCategory {
    Star,
    Shooter,
    Playmaker,
}

impl AbsenceCategory {
    pub const ALL: [AbsenceCategory; 3] = [
        AbsenceCategory::Star,
        AbsenceCategory::Shooter,
        AbsenceCategory::Playmaker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceCategory::Star => "star",
            AbsenceCategory::Shooter => "shooter",
            AbsenceCategory::Playmaker => "playmaker",
        }
    }
}

impl std::str::FromStr for AbsenceCategory {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "star" => Ok(AbsenceCategory::Star),
            "shooter" => Ok(AbsenceCategory::Shooter),
            "playmaker" | "passer" => Ok(AbsenceCategory::Playmaker),
            other => Err(ProjectionError::InvalidInput(format!(
                "Unknown absence category '{}'",
                other
            ))),
        }
    }
}

/// Rest and absence inputs for one side of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SituationalAdjustment {
    pub is_back_to_back: bool,
    /// Threes subtracted after pace and rest scaling
    pub absence_penalty: f64,
}

impl SituationalAdjustment {
    pub fn new(is_back_to_back: bool, absence_penalty: f64) -> Self {
        Self {
            is_back_to_back,
            absence_penalty,
        }
    }

    /// No fatigue, full roster
    pub fn rested() -> Self {
        Self::default()
    }

    /// Penalty from selected absence categories (each counted once)
    pub fn from_categories(
        is_back_to_back: bool,
        absences: &[AbsenceCategory],
        penalty_per_category: f64,
    ) -> Self {
        let distinct: BTreeSet<_> = absences.iter().collect();
        Self {
            is_back_to_back,
            absence_penalty: distinct.len() as f64 * penalty_per_category,
        }
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        validate_non_negative("absence_penalty", self.absence_penalty)
    }
}

/// Projected threes for each side and the combined total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub home_projection: f64,
    pub away_projection: f64,
    pub total_projection: f64,
    pub match_pace: f64,
    pub pace_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tempo {
    Fast,
    Slow,
}

impl ProjectionResult {
    pub fn tempo(&self) -> Tempo {
        if self.pace_factor > 1.0 {
            Tempo::Fast
        } else {
            Tempo::Slow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalClass {
    Over,
    Under,
    Neutral,
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalClass::Over => "OVER",
            SignalClass::Under => "UNDER",
            SignalClass::Neutral => "NEUTRAL",
        };
        f.write_str(s)
    }
}

/// Projection compared against a bookmaker line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeSignal {
    /// total_projection - bookmaker_line
    pub edge: f64,
    pub classification: SignalClass,
}

/// Team identifier accepted by stats lookups: numeric id or display name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TeamRef {
    Id(u32),
    Name(String),
}

impl From<u32> for TeamRef {
    fn from(id: u32) -> Self {
        TeamRef::Id(id)
    }
}

impl From<&str> for TeamRef {
    fn from(s: &str) -> Self {
        match s.trim().parse::<u32>() {
            Ok(id) => TeamRef::Id(id),
            Err(_) => TeamRef::Name(s.trim().to_string()),
        }
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamRef::Id(id) => write!(f, "#{}", id),
            TeamRef::Name(name) => f.write_str(name),
        }
    }
}

/// One game on the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledGame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    pub home_id: u32,
    pub away_id: u32,
}

impl ScheduledGame {
    pub fn new(home_id: u32, away_id: u32) -> Self {
        Self {
            game_id: None,
            home_id,
            away_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: u32, pace: f64) -> TeamStatProfile {
        TeamStatProfile::new(id, format!("Team {}", id), 12.0, 12.0, pace).unwrap()
    }

    #[test]
    fn test_profile_rejects_negative_and_nan() {
        assert!(TeamStatProfile::new(1, "A", -1.0, 12.0, 99.0).is_err());
        assert!(TeamStatProfile::new(1, "A", 12.0, f64::NAN, 99.0).is_err());
        assert!(TeamStatProfile::new(1, "A", 12.0, 12.0, f64::INFINITY).is_err());
        assert!(TeamStatProfile::new(1, "A", 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_league_context_mean() {
        let profiles = vec![profile(1, 100.0), profile(2, 98.0), profile(3, 102.0)];
        let league = LeagueContext::from_profiles(&profiles).unwrap();
        assert!((league.average_pace - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_league_context_empty_is_division_undefined() {
        let profiles: Vec<TeamStatProfile> = Vec::new();
        let err = LeagueContext::from_profiles(&profiles).unwrap_err();
        assert!(matches!(err, ProjectionError::DivisionUndefined(_)));
    }

    #[test]
    fn test_matchup_label() {
        let home = TeamStatProfile::new(1, "Boston Celtics", 15.0, 12.0, 98.0).unwrap();
        let away = TeamStatProfile::new(2, "Miami Heat", 13.0, 12.5, 97.0).unwrap();
        assert_eq!(Matchup::new(home, away).label(), "Miami Heat @ Boston Celtics");
    }

    #[test]
    fn test_absence_categories_count_once() {
        let adj = SituationalAdjustment::from_categories(
            false,
            &[
                AbsenceCategory::Star,
                AbsenceCategory::Shooter,
                AbsenceCategory::Star,
            ],
            1.6,
        );
        assert!((adj.absence_penalty - 3.2).abs() < 1e-9);
        assert!(!adj.is_back_to_back);

        let none = SituationalAdjustment::from_categories(true, &[], 1.5);
        assert_eq!(none.absence_penalty, 0.0);
        assert!(none.is_back_to_back);
    }

    #[test]
    fn test_absence_category_parse() {
        assert_eq!("Star".parse::<AbsenceCategory>().unwrap(), AbsenceCategory::Star);
        assert_eq!(
            " passer ".parse::<AbsenceCategory>().unwrap(),
            AbsenceCategory::Playmaker
        );
        assert!("coach".parse::<AbsenceCategory>().is_err());
    }

    #[test]
    fn test_adjustment_validate() {
        assert!(SituationalAdjustment::new(false, 2.0).validate().is_ok());
        assert!(SituationalAdjustment::new(false, -0.5).validate().is_err());
    }

    #[test]
    fn test_tempo() {
        let mut result = ProjectionResult {
            home_projection: 12.0,
            away_projection: 12.0,
            total_projection: 24.0,
            match_pace: 101.0,
            pace_factor: 1.02,
        };
        assert_eq!(result.tempo(), Tempo::Fast);
        result.pace_factor = 1.0;
        assert_eq!(result.tempo(), Tempo::Slow);
    }

    #[test]
    fn test_team_ref_from_str() {
        assert_eq!(TeamRef::from("1610612738"), TeamRef::Id(1610612738));
        assert_eq!(
            TeamRef::from(" Miami Heat "),
            TeamRef::Name("Miami Heat".to_string())
        );
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(SignalClass::Over.to_string(), "OVER");
        assert_eq!(SignalClass::Neutral.to_string(), "NEUTRAL");
    }
}
