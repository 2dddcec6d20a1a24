//! Three-point total projection
//!
//! Cross-projection normalized for tempo:
//!     match_pace  = (home.pace + away.pace) / 2
//!     pace_factor = match_pace / league.average_pace
//!     base_home   = (home.scored_rate + away.allowed_rate) / 2
//!     home        = base_home * pace_factor * rest_mult_home - absence_penalty_home
//!
//! and symmetrically for the away side. Projections are not clamped: a large
//! absence penalty can push a side below zero.

use crate::config::{EngineConfig, DEFAULT_REST_MULTIPLIER};
use crate::error::{validate_finite, ProjectionError};
use crate::models::{
    LeagueContext, Matchup, ProjectionResult, SituationalAdjustment, TeamStatProfile,
};

/// Project both sides with the default rest multiplier
///
/// # Examples
/// ```
/// use nba3p::core::projection::project;
/// use nba3p::{LeagueContext, SituationalAdjustment, TeamStatProfile};
///
/// let home = TeamStatProfile::new(1, "Home", 13.0, 11.5, 100.0).unwrap();
/// let away = TeamStatProfile::new(2, "Away", 12.5, 12.0, 98.0).unwrap();
/// let league = LeagueContext { average_pace: 99.0 };
/// let rested = SituationalAdjustment::rested();
///
/// let result = project(&home, &away, &league, &rested, &rested).unwrap();
/// assert!((result.home_projection - 12.5).abs() < 1e-9);
/// ```
pub fn project(
    home: &TeamStatProfile,
    away: &TeamStatProfile,
    league: &LeagueContext,
    adj_home: &SituationalAdjustment,
    adj_away: &SituationalAdjustment,
) -> Result<ProjectionResult, ProjectionError> {
    project_with_rest(
        home,
        away,
        league,
        adj_home,
        adj_away,
        DEFAULT_REST_MULTIPLIER,
    )
}

/// Project both sides with an explicit back-to-back multiplier
pub fn project_with_rest(
    home: &TeamStatProfile,
    away: &TeamStatProfile,
    league: &LeagueContext,
    adj_home: &SituationalAdjustment,
    adj_away: &SituationalAdjustment,
    rest_multiplier: f64,
) -> Result<ProjectionResult, ProjectionError> {
    home.validate()?;
    away.validate()?;
    adj_home.validate()?;
    adj_away.validate()?;
    validate_finite("rest_multiplier", rest_multiplier)?;

    let pace_factor = calculate_pace_factor(home.pace, away.pace, league.average_pace)?;
    let match_pace = (home.pace + away.pace) / 2.0;

    let base_home = cross_projection(home.scored_rate, away.allowed_rate);
    let base_away = cross_projection(away.scored_rate, home.allowed_rate);

    let home_projection = adjust_side(base_home, pace_factor, adj_home, rest_multiplier);
    let away_projection = adjust_side(base_away, pace_factor, adj_away, rest_multiplier);

    Ok(ProjectionResult {
        home_projection,
        away_projection,
        total_projection: home_projection + away_projection,
        match_pace,
        pace_factor,
    })
}

/// Ratio of the matchup's mean pace to the league average
pub fn calculate_pace_factor(
    home_pace: f64,
    away_pace: f64,
    average_pace: f64,
) -> Result<f64, ProjectionError> {
    validate_finite("average_pace", average_pace)?;
    if average_pace == 0.0 {
        return Err(ProjectionError::DivisionUndefined(
            "league average pace is zero".to_string(),
        ));
    }
    if average_pace < 0.0 {
        return Err(ProjectionError::InvalidInput(format!(
            "league average pace must be positive, got {}",
            average_pace
        )));
    }

    let match_pace = (home_pace + away_pace) / 2.0;
    Ok(match_pace / average_pace)
}

/// A team's own rate averaged with the opponent's concession rate
pub fn cross_projection(scored_rate: f64, opponent_allowed_rate: f64) -> f64 {
    (scored_rate + opponent_allowed_rate) / 2.0
}

// Order matters for bit-exact output: (base * pace) * rest, then subtract.
fn adjust_side(
    base: f64,
    pace_factor: f64,
    adj: &SituationalAdjustment,
    rest_multiplier: f64,
) -> f64 {
    let rest = if adj.is_back_to_back {
        rest_multiplier
    } else {
        1.0
    };
    base * pace_factor * rest - adj.absence_penalty
}

/// Projection engine bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    pub config: EngineConfig,
}

impl ProjectionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn project(
        &self,
        matchup: &Matchup,
        league: &LeagueContext,
        adj_home: &SituationalAdjustment,
        adj_away: &SituationalAdjustment,
    ) -> Result<ProjectionResult, ProjectionError> {
        project_with_rest(
            &matchup.home,
            &matchup.away,
            league,
            adj_home,
            adj_away,
            self.config.rest_multiplier,
        )
    }
}
