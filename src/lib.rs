//! NBA 3PT - Three-point total projections
//!
//! This library provides:
//! - Pace-adjusted projection of combined made threes for a matchup
//! - Edge evaluation against a bookmaker line
//! - Team stat resolution from heterogeneous stats sources
//! - A session bet ledger with CSV export
//!
//! # Example
//!
//! ```
//! use nba3p::analysis::{Analyzer, MatchupRequest};
//! use nba3p::{EngineConfig, LeagueContext, LeagueTable, SignalClass, TeamStatProfile};
//!
//! let table = LeagueTable::from_profiles(vec![
//!     TeamStatProfile::new(1, "Boston Celtics", 13.0, 11.5, 100.0).unwrap(),
//!     TeamStatProfile::new(2, "Miami Heat", 12.5, 12.0, 98.0).unwrap(),
//! ]);
//! let league = LeagueContext { average_pace: 99.0 };
//!
//! let analyzer = Analyzer::new(&table, league, EngineConfig::default());
//! let analysis = analyzer
//!     .analyze(&MatchupRequest::new(1, 2).with_line(22.0))
//!     .unwrap();
//!
//! assert!((analysis.projection.total_projection - 24.5).abs() < 1e-9);
//! assert_eq!(analysis.signal.unwrap().classification, SignalClass::Over);
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod ledger;
pub mod models;
pub mod provider;
pub mod stats_api;

// Re-export commonly used types
pub use config::EngineConfig;
pub use data::{LeagueTable, Schedule};
pub use error::ProjectionError;
pub use ledger::{LedgerEntry, SessionLedger};
pub use models::{
    AbsenceCategory, EdgeSignal, LeagueContext, Matchup, ProjectionResult, ScheduledGame,
    SignalClass, SituationalAdjustment, TeamRef, TeamStatProfile, Tempo,
};
pub use provider::{ScheduleProvider, StatsProvider};
