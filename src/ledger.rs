//! Session bet ledger
//!
//! Append-only record of bets the user chose to save during this session.
//! Nothing is persisted unless the user exports it.

use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::{validate_finite, validate_odds, validate_stake, ProjectionError};

/// Column headers of the exported CSV
pub const LEDGER_COLUMNS: [&str; 5] = ["date", "matchup", "projection", "stake", "odds"];

/// A saved bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub matchup_label: String,
    pub total_projection: f64,
    pub stake: f64,
    /// Decimal odds
    pub odds: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionLedger {
    entries: Vec<LedgerEntry>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a bet timestamped now
    pub fn record(
        &mut self,
        matchup_label: impl Into<String>,
        total_projection: f64,
        stake: f64,
        odds: f64,
    ) -> Result<&LedgerEntry, ProjectionError> {
        self.record_at(Utc::now(), matchup_label, total_projection, stake, odds)
    }

    pub fn record_at(
        &mut self,
        timestamp: DateTime<Utc>,
        matchup_label: impl Into<String>,
        total_projection: f64,
        stake: f64,
        odds: f64,
    ) -> Result<&LedgerEntry, ProjectionError> {
        validate_finite("total_projection", total_projection)?;
        validate_stake(stake)?;
        validate_odds(odds)?;

        let entry = LedgerEntry {
            timestamp,
            matchup_label: matchup_label.into(),
            total_projection,
            stake,
            odds,
        };
        info!(
            "Saved bet: {} (projection {:.1}, stake {:.2} @ {:.2})",
            entry.matchup_label, entry.total_projection, entry.stake, entry.odds
        );
        self.entries.push(entry);

        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_staked(&self) -> f64 {
        self.entries.iter().map(|e| e.stake).sum()
    }

    /// Flat table, one row per saved bet
    pub fn to_dataframe(&self) -> Result<DataFrame, ProjectionError> {
        let dates: Vec<String> = self
            .entries
            .iter()
            .map(|e| e.timestamp.format("%Y-%m-%d %H:%M").to_string())
            .collect();
        let labels: Vec<String> = self.entries.iter().map(|e| e.matchup_label.clone()).collect();
        let projections: Vec<f64> = self
            .entries
            .iter()
            .map(|e| round2(e.total_projection))
            .collect();
        let stakes: Vec<f64> = self.entries.iter().map(|e| e.stake).collect();
        let odds: Vec<f64> = self.entries.iter().map(|e| e.odds).collect();

        let df = DataFrame::new(vec![
            Series::new(LEDGER_COLUMNS[0], dates),
            Series::new(LEDGER_COLUMNS[1], labels),
            Series::new(LEDGER_COLUMNS[2], projections),
            Series::new(LEDGER_COLUMNS[3], stakes),
            Series::new(LEDGER_COLUMNS[4], odds),
        ])?;
        Ok(df)
    }

    /// Comma-separated export with a header row
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), ProjectionError> {
        let mut df = self.to_dataframe()?;
        CsvWriter::new(writer)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;
        Ok(())
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ProjectionError> {
        let path = path.as_ref();
        let mut file = File::create(path)
            .map_err(|e| ProjectionError::Io(format!("{}: {}", path.display(), e)))?;
        self.write_csv(&mut file)?;
        info!("Exported {} ledger entries to {:?}", self.len(), path);
        Ok(())
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut ledger = SessionLedger::new();
        assert!(ledger.is_empty());

        ledger
            .record_at(at(18), "Miami Heat @ Boston Celtics", 24.5, 10.0, 1.91)
            .unwrap();
        ledger
            .record_at(at(19), "Lakers @ Warriors", 27.25, 20.0, 1.87)
            .unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].matchup_label, "Miami Heat @ Boston Celtics");
        assert_eq!(ledger.entries()[1].matchup_label, "Lakers @ Warriors");
        assert!((ledger.total_staked() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_rejects_invalid_bets() {
        let mut ledger = SessionLedger::new();
        assert!(ledger.record("A @ B", 24.0, 0.0, 1.9).is_err());
        assert!(ledger.record("A @ B", 24.0, 10.0, 0.8).is_err());
        assert!(ledger.record("A @ B", f64::NAN, 10.0, 1.9).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_write_csv() {
        let mut ledger = SessionLedger::new();
        ledger
            .record_at(at(18), "Miami Heat @ Boston Celtics", 24.5, 10.0, 1.91)
            .unwrap();
        ledger
            .record_at(at(19), "Lakers @ Warriors", 27.256, 20.0, 1.87)
            .unwrap();

        let mut out = Vec::new();
        ledger.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,matchup,projection,stake,odds");
        assert!(lines[1].starts_with("2025-01-15 18:30,Miami Heat @ Boston Celtics,24.5,"));
        assert!(lines[2].contains("27.26"));
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut out = Vec::new();
        SessionLedger::new().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some("date,matchup,projection,stake,odds"));
        assert_eq!(text.lines().count(), 1);
    }
}
