//! CSV and JSON loading for stats and schedule files

use chrono::NaiveDate;
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use super::aliases::{ProfileResolver, SourceCoverage};
use super::league::LeagueTable;
use super::schedule::Schedule;
use crate::error::ProjectionError;

/// Read a CSV file into loosely typed records, one per row
pub fn read_csv_records<P: AsRef<Path>>(
    csv_path: P,
) -> Result<Vec<Map<String, Value>>, ProjectionError> {
    let path = csv_path.as_ref();
    if !path.exists() {
        return Err(ProjectionError::Io(format!("{}: file not found", path.display())));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!("Read {} rows from {:?}", df.height(), path);
    dataframe_to_records(&df)
}

/// Same as [`read_csv_records`] for an in-memory or already-open source
pub fn read_csv_records_from<R: MmapBytesReader>(
    reader: R,
) -> Result<Vec<Map<String, Value>>, ProjectionError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(reader)
        .finish()?;

    dataframe_to_records(&df)
}

/// Load a stats file (`.csv` or `.json`) into a league table
///
/// Field coverage is detected from the file: a column that is absent
/// altogether gets the configured fallback, an empty cell does not.
pub fn load_stats<P: AsRef<Path>>(
    path: P,
    resolver: &ProfileResolver,
) -> Result<LeagueTable, ProjectionError> {
    let path = path.as_ref();
    let records = if is_json(path) {
        read_json_records(path)?
    } else {
        read_csv_records(path)?
    };
    Ok(table_from_records(&records, resolver))
}

pub fn table_from_records(records: &[Map<String, Value>], resolver: &ProfileResolver) -> LeagueTable {
    let coverage = SourceCoverage::detect(&resolver.aliases, records);
    LeagueTable::from_records(records, resolver, coverage)
}

/// Load a schedule file: a serialized [`Schedule`] (`.json`) or a CSV of games
pub fn load_schedule<P: AsRef<Path>>(path: P, date: NaiveDate) -> Result<Schedule, ProjectionError> {
    let path = path.as_ref();
    if is_json(path) {
        return Schedule::load_json(path);
    }
    let records = read_csv_records(path)?;
    Ok(Schedule::from_records(date, &records))
}

/// JSON array of (possibly nested) team records
pub fn read_json_records<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Map<String, Value>>, ProjectionError> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| ProjectionError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    parse_json_records(&content)
}

pub fn parse_json_records(content: &str) -> Result<Vec<Map<String, Value>>, ProjectionError> {
    let value: Value = serde_json::from_str(content)?;
    let rows = value
        .as_array()
        .ok_or_else(|| ProjectionError::Parse("expected a JSON array of team records".to_string()))?;

    rows.iter()
        .map(|row| {
            row.as_object()
                .cloned()
                .ok_or_else(|| ProjectionError::Parse(format!("not a record: {}", row)))
        })
        .collect()
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn dataframe_to_records(df: &DataFrame) -> Result<Vec<Map<String, Value>>, ProjectionError> {
    let columns = df.get_columns();
    let mut records = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let mut record = Map::with_capacity(columns.len());
        for series in columns {
            let value = series.get(i)?;
            record.insert(series.name().to_string(), any_value_to_json(&value));
        }
        records.push(record);
    }

    Ok(records)
}

fn any_value_to_json(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        AnyValue::Float32(v) => float_to_json(*v as f64),
        AnyValue::Float64(v) => float_to_json(*v),
        other => Value::String(other.to_string()),
    }
}

fn float_to_json(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamRef;
    use crate::provider::StatsProvider;
    use std::io::Cursor;

    const STATS_CSV: &str = "\
TEAM_ID,TEAM_NAME,FG3M,OPP_FG3M,PACE
1610612738,Boston Celtics,16.1,12.4,97.3
1610612748,Miami Heat,12.9,13.1,96
1610612744,Golden State Warriors,,12.0,100.1
";

    fn records(csv: &str) -> Vec<Map<String, Value>> {
        read_csv_records_from(Cursor::new(csv.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn test_read_csv_records() {
        let rows = records(STATS_CSV);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["TEAM_NAME"], Value::String("Boston Celtics".to_string()));
        assert!(rows[2]["FG3M"].is_null());
    }

    #[test]
    fn test_stats_table_from_csv() {
        let table = table_from_records(&records(STATS_CSV), &ProfileResolver::default());

        assert_eq!(table.len(), 2);
        let heat = table.get_team_stats(&TeamRef::Id(1610612748)).unwrap();
        assert!((heat.pace - 96.0).abs() < 1e-9);

        // Empty FG3M cell: the team is rejected, not defaulted
        let err = table.get_team_stats(&TeamRef::Id(1610612744)).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::missing_field("Golden State Warriors", "scored_rate")
        );
    }

    #[test]
    fn test_offense_only_csv_uses_fallbacks() {
        let csv = "team_id,team_name,fg3m\n1,Alpha,13.0\n2,Beta,12.0\n";
        let table = table_from_records(&records(csv), &ProfileResolver::default());

        assert_eq!(table.len(), 2);
        for profile in table.profiles() {
            assert!((profile.allowed_rate - 11.5).abs() < 1e-9);
            assert!((profile.pace - 99.0).abs() < 1e-9);
        }
        let league = table.league_context().unwrap();
        assert!((league.average_pace - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_pace_cell_rejects_team() {
        let csv = "TEAM_ID,TEAM_NAME,FG3M,OPP_FG3M,PACE\n1,Alpha,13.0,12.0,\n2,Beta,12.0,11.0,98.5\n";
        let table = table_from_records(&records(csv), &ProfileResolver::default());
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get_team_stats(&TeamRef::Id(1)).unwrap_err(),
            ProjectionError::missing_field("Alpha", "pace")
        );
    }

    #[test]
    fn test_schedule_from_csv() {
        let csv = "GAME_ID,HOME_TEAM_ID,VISITOR_TEAM_ID\n0022400555,1610612738,1610612748\n";
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let schedule = Schedule::from_records(date, &records(csv));
        assert_eq!(schedule.games.len(), 1);
        assert_eq!(schedule.games[0].home_id, 1610612738);
        assert_eq!(schedule.games[0].away_id, 1610612748);
    }

    #[test]
    fn test_parse_json_records() {
        let rows = parse_json_records(
            r#"[{"TEAM_ID": 1, "FG3M": 13.0, "opponent": {"OPP_FG3M": 12.0}}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0]["opponent"].is_object());

        assert!(parse_json_records(r#"{"TEAM_ID": 1}"#).is_err());
        assert!(parse_json_records(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_csv_records("/nonexistent/stats.csv"),
            Err(ProjectionError::Io(_))
        ));
    }
}
