//! Lookups the evaluation flow depends on
//!
//! Implementations hold already-fetched data; evaluation never triggers a
//! fetch. See [`crate::data::LeagueTable`] and [`crate::data::Schedule`].

use crate::error::ProjectionError;
use crate::models::{ScheduledGame, TeamRef, TeamStatProfile};

/// Per-team stats lookup
pub trait StatsProvider {
    /// `DataUnavailable` when the team is unknown, `MissingRequiredField`
    /// when the team was present but could not be resolved
    fn get_team_stats(&self, team: &TeamRef) -> Result<TeamStatProfile, ProjectionError>;
}

/// Today's games
pub trait ScheduleProvider {
    /// An empty list means no games, not an error
    fn get_todays_matchups(&self) -> Result<Vec<ScheduledGame>, ProjectionError>;
}
