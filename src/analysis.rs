//! Matchup and slate evaluation
//!
//! Ties the stats lookup, projection engine and edge evaluator together.
//! Each matchup in a slate is evaluated independently: a team that cannot be
//! resolved fails its own matchup and nothing else.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::core::edge::evaluate_edge;
use crate::core::projection::ProjectionEngine;
use crate::error::ProjectionError;
use crate::models::{
    EdgeSignal, LeagueContext, Matchup, ProjectionResult, ScheduledGame, SituationalAdjustment,
    TeamRef, TeamStatProfile,
};
use crate::provider::{ScheduleProvider, StatsProvider};

/// One matchup to evaluate, with its situational inputs
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRequest {
    pub home: TeamRef,
    pub away: TeamRef,
    pub adj_home: SituationalAdjustment,
    pub adj_away: SituationalAdjustment,
    /// Bookmaker line; no edge signal without one
    pub line: Option<f64>,
}

impl MatchupRequest {
    pub fn new(home: impl Into<TeamRef>, away: impl Into<TeamRef>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            adj_home: SituationalAdjustment::rested(),
            adj_away: SituationalAdjustment::rested(),
            line: None,
        }
    }

    pub fn from_game(game: &ScheduledGame) -> Self {
        Self::new(game.home_id, game.away_id)
    }

    pub fn with_line(mut self, line: f64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_adjustments(
        mut self,
        adj_home: SituationalAdjustment,
        adj_away: SituationalAdjustment,
    ) -> Self {
        self.adj_home = adj_home;
        self.adj_away = adj_away;
        self
    }

    pub fn label(&self) -> String {
        format!("{} @ {}", self.away, self.home)
    }
}

/// Evaluated matchup
#[derive(Debug, Clone, Serialize)]
pub struct MatchupAnalysis {
    pub home: TeamStatProfile,
    pub away: TeamStatProfile,
    pub projection: ProjectionResult,
    pub line: Option<f64>,
    pub signal: Option<EdgeSignal>,
}

impl MatchupAnalysis {
    pub fn label(&self) -> String {
        format!("{} @ {}", self.away.team_name, self.home.team_name)
    }

    /// Plain-text summary for copying out, only when a line was given
    pub fn report(&self) -> Option<String> {
        let line = self.line?;
        let signal = self.signal?;
        Some(format!(
            "PRO-ANALYSIS: {}\nProjection: {:.1} | Line: {:.1}\nSignal: {} | Edge: {:.2}",
            self.label(),
            self.projection.total_projection,
            line,
            signal.classification,
            signal.edge.abs()
        ))
    }
}

/// Result for one entry of a slate
#[derive(Debug, Clone)]
pub struct MatchupOutcome {
    pub request: MatchupRequest,
    pub result: Result<MatchupAnalysis, ProjectionError>,
}

/// Evaluates matchups against a stats provider
pub struct Analyzer<'a, P: StatsProvider> {
    provider: &'a P,
    league: LeagueContext,
    engine: ProjectionEngine,
}

impl<'a, P: StatsProvider> Analyzer<'a, P> {
    pub fn new(provider: &'a P, league: LeagueContext, config: EngineConfig) -> Self {
        Self {
            provider,
            league,
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.engine.config
    }

    pub fn league(&self) -> &LeagueContext {
        &self.league
    }

    /// Stats for both sides, home first
    pub fn resolve_teams(
        &self,
        request: &MatchupRequest,
    ) -> Result<(TeamStatProfile, TeamStatProfile), ProjectionError> {
        let home = self.provider.get_team_stats(&request.home)?;
        let away = self.provider.get_team_stats(&request.away)?;
        Ok((home, away))
    }

    /// Look up both teams, project, and compare to the line if present
    pub fn analyze(&self, request: &MatchupRequest) -> Result<MatchupAnalysis, ProjectionError> {
        if let Some(line) = request.line {
            crate::error::validate_finite("bookmaker_line", line)?;
        }

        let (home, away) = self.resolve_teams(request)?;
        let matchup = Matchup::new(home, away);

        let projection =
            self.engine
                .project(&matchup, &self.league, &request.adj_home, &request.adj_away)?;

        let signal = match request.line {
            Some(line) => Some(evaluate_edge(
                projection.total_projection,
                line,
                self.engine.config.edge_threshold,
            )?),
            None => None,
        };

        debug!(
            "{}: total {:.2} (pace factor {:.3})",
            matchup.label(),
            projection.total_projection,
            projection.pace_factor
        );

        Ok(MatchupAnalysis {
            home: matchup.home,
            away: matchup.away,
            projection,
            line: request.line,
            signal,
        })
    }

    /// Evaluate every request; failures stay attached to their own entry
    pub fn analyze_slate(&self, requests: &[MatchupRequest]) -> Vec<MatchupOutcome> {
        requests
            .iter()
            .map(|request| {
                let result = self.analyze(request);
                if let Err(e) = &result {
                    warn!("Skipping {}: {}", request.label(), e);
                }
                MatchupOutcome {
                    request: request.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// One rested, line-less request per scheduled game
pub fn requests_for_schedule<S: ScheduleProvider>(
    schedule: &S,
) -> Result<Vec<MatchupRequest>, ProjectionError> {
    Ok(schedule
        .get_todays_matchups()?
        .iter()
        .map(MatchupRequest::from_game)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LeagueTable, Schedule};
    use crate::models::SignalClass;
    use chrono::NaiveDate;

    fn table() -> LeagueTable {
        LeagueTable::from_profiles(vec![
            TeamStatProfile::new(1, "Home", 13.0, 11.5, 100.0).unwrap(),
            TeamStatProfile::new(2, "Away", 12.5, 12.0, 98.0).unwrap(),
            TeamStatProfile::new(3, "Third", 14.0, 13.0, 99.0).unwrap(),
        ])
    }

    const LEAGUE: LeagueContext = LeagueContext { average_pace: 99.0 };

    #[test]
    fn test_analyze_with_line() {
        let table = table();
        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());

        let analysis = analyzer
            .analyze(&MatchupRequest::new(1, 2).with_line(22.0))
            .unwrap();

        assert!((analysis.projection.total_projection - 24.5).abs() < 1e-9);
        let signal = analysis.signal.unwrap();
        assert!((signal.edge - 2.5).abs() < 1e-9);
        assert_eq!(signal.classification, SignalClass::Over);
        assert_eq!(analysis.label(), "Away @ Home");
    }

    #[test]
    fn test_analyze_without_line_has_no_signal() {
        let table = table();
        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());
        let analysis = analyzer.analyze(&MatchupRequest::new(1, 2)).unwrap();
        assert!(analysis.signal.is_none());
        assert!(analysis.report().is_none());
    }

    #[test]
    fn test_configured_threshold() {
        let table = table();
        let config = EngineConfig {
            edge_threshold: 3.0,
            ..Default::default()
        };
        let analyzer = Analyzer::new(&table, LEAGUE, config);
        let analysis = analyzer
            .analyze(&MatchupRequest::new(1, 2).with_line(22.0))
            .unwrap();
        assert_eq!(analysis.signal.unwrap().classification, SignalClass::Neutral);
    }

    #[test]
    fn test_adjustments_flow_through() {
        let table = table();
        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());
        let request = MatchupRequest::new(1, 2).with_adjustments(
            SituationalAdjustment::new(true, 0.0),
            SituationalAdjustment::new(false, 1.6),
        );
        let analysis = analyzer.analyze(&request).unwrap();
        assert!((analysis.projection.home_projection - 11.75).abs() < 1e-9);
        assert!((analysis.projection.away_projection - 10.4).abs() < 1e-9);
    }

    #[test]
    fn test_report() {
        let table = table();
        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());
        let analysis = analyzer
            .analyze(&MatchupRequest::new(1, 2).with_line(26.5))
            .unwrap();

        assert_eq!(
            analysis.report().unwrap(),
            "PRO-ANALYSIS: Away @ Home\nProjection: 24.5 | Line: 26.5\nSignal: UNDER | Edge: 2.00"
        );
    }

    #[test]
    fn test_invalid_line_rejected() {
        let table = table();
        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());
        let err = analyzer
            .analyze(&MatchupRequest::new(1, 2).with_line(f64::NAN))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput(_)));
    }

    #[test]
    fn test_slate_partial_failure() {
        let mut profiles = table().profiles().to_vec();
        profiles.push(TeamStatProfile::new(4, "Fourth", 12.0, 12.0, 99.0).unwrap());
        let records: Vec<_> = profiles
            .iter()
            .map(|p| {
                serde_json::json!({
                    "TEAM_ID": p.team_id,
                    "TEAM_NAME": p.team_name,
                    "FG3M": p.scored_rate,
                    "OPP_FG3M": p.allowed_rate,
                    "PACE": p.pace
                })
                .as_object()
                .cloned()
                .unwrap()
            })
            .chain(std::iter::once(
                serde_json::json!({
                    "TEAM_ID": 5,
                    "TEAM_NAME": "No Threes",
                    "OPP_FG3M": 12.0,
                    "PACE": 99.0
                })
                .as_object()
                .cloned()
                .unwrap(),
            ))
            .collect();
        let table = crate::data::table_from_records(
            &records,
            &crate::data::ProfileResolver::default(),
        );

        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());
        let outcomes = analyzer.analyze_slate(&[
            MatchupRequest::new(5, 4).with_line(22.5),
            MatchupRequest::new(1, 2).with_line(22.5),
        ]);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0].result.as_ref().unwrap_err(),
            &ProjectionError::missing_field("No Threes", "scored_rate")
        );
        let ok = outcomes[1].result.as_ref().unwrap();
        assert!((ok.projection.total_projection - 24.5).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_teams_by_name() {
        let table = table();
        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());

        let (home, away) = analyzer
            .resolve_teams(&MatchupRequest::new("home", "Away"))
            .unwrap();
        assert_eq!(home.team_id, 1);
        assert_eq!(away.team_id, 2);

        let err = analyzer
            .resolve_teams(&MatchupRequest::new("Home", ""))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::DataUnavailable(_)));
    }

    #[test]
    fn test_unknown_team_is_unavailable() {
        let table = table();
        let analyzer = Analyzer::new(&table, LEAGUE, EngineConfig::default());
        let err = analyzer.analyze(&MatchupRequest::new(1, 42)).unwrap_err();
        assert!(matches!(err, ProjectionError::DataUnavailable(_)));
    }

    #[test]
    fn test_requests_for_schedule() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let schedule = Schedule::new(
            date,
            vec![ScheduledGame::new(1, 2), ScheduledGame::new(3, 1)],
        );
        let requests = requests_for_schedule(&schedule).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].home, TeamRef::Id(3));
        assert_eq!(requests[1].away, TeamRef::Id(1));
        assert!(requests[0].line.is_none());

        let empty = Schedule::new(date, Vec::new());
        assert!(requests_for_schedule(&empty).unwrap().is_empty());
    }
}
