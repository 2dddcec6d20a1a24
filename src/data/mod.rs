//! Stats and schedule loading

pub mod aliases;
pub mod csv_loader;
pub mod league;
pub mod schedule;

// Re-export commonly used types
pub use aliases::{AliasTable, ProfileResolver, SourceCoverage, StatField};
pub use csv_loader::{
    load_schedule, load_stats, parse_json_records, read_csv_records, read_csv_records_from,
    read_json_records, table_from_records,
};
pub use league::{merge_team_tables, LeagueTable, RejectedTeam, DEFAULT_MAX_AGE_SECS};
pub use schedule::Schedule;
