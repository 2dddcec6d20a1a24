use thiserror::Error;

/// Errors raised while resolving stats or evaluating a matchup
///
/// Every variant is scoped to a single team or matchup: callers evaluating a
/// slate record the error against that entry and move on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Provider unreachable, non-success response, or team not in the stats set
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// A required field could not be found under any known alias
    #[error("Missing required field '{field}' for team {team}")]
    MissingRequiredField { team: String, field: String },

    /// League average pace is zero (or no teams were loaded)
    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    /// Non-finite or out-of-range numeric input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local file could not be read or written
    #[error("I/O error: {0}")]
    Io(String),

    /// Local file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProjectionError {
    pub fn missing_field(team: impl Into<String>, field: impl Into<String>) -> Self {
        ProjectionError::MissingRequiredField {
            team: team.into(),
            field: field.into(),
        }
    }
}

impl From<std::io::Error> for ProjectionError {
    fn from(e: std::io::Error) -> Self {
        ProjectionError::Io(e.to_string())
    }
}

impl From<polars::prelude::PolarsError> for ProjectionError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        ProjectionError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for ProjectionError {
    fn from(e: serde_json::Error) -> Self {
        ProjectionError::Parse(e.to_string())
    }
}

/// Validation functions
pub fn validate_finite(name: &str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() {
        return Err(ProjectionError::InvalidInput(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

pub fn validate_non_negative(name: &str, value: f64) -> Result<(), ProjectionError> {
    validate_finite(name, value)?;
    if value < 0.0 {
        return Err(ProjectionError::InvalidInput(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

pub fn validate_threshold(threshold: f64) -> Result<(), ProjectionError> {
    validate_finite("threshold", threshold)?;
    if threshold <= 0.0 {
        return Err(ProjectionError::InvalidInput(format!(
            "Edge threshold must be strictly positive, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Decimal odds: 1.0 returns the stake, anything lower is not a price
pub fn validate_odds(odds: f64) -> Result<(), ProjectionError> {
    validate_finite("odds", odds)?;
    if odds < 1.0 {
        return Err(ProjectionError::InvalidInput(format!(
            "Odds must be at least 1.0, got {}",
            odds
        )));
    }
    Ok(())
}

pub fn validate_stake(stake: f64) -> Result<(), ProjectionError> {
    validate_finite("stake", stake)?;
    if stake <= 0.0 {
        return Err(ProjectionError::InvalidInput(format!(
            "Stake must be positive, got {}",
            stake
        )));
    }
    Ok(())
}
