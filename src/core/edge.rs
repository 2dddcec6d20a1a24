//! Edge evaluation against a bookmaker line

use crate::error::{validate_finite, validate_threshold, ProjectionError};
use crate::models::{EdgeSignal, SignalClass};

/// Compare a projected total to a line
///
/// OVER/UNDER only when |edge| reaches the threshold, NEUTRAL otherwise.
///
/// # Examples
/// ```
/// use nba3p::core::edge::evaluate_edge;
/// use nba3p::SignalClass;
///
/// let signal = evaluate_edge(25.0, 22.5, 2.0).unwrap();
/// assert_eq!(signal.classification, SignalClass::Over);
/// assert!((signal.edge - 2.5).abs() < 1e-9);
/// ```
pub fn evaluate_edge(
    total_projection: f64,
    bookmaker_line: f64,
    threshold: f64,
) -> Result<EdgeSignal, ProjectionError> {
    validate_finite("total_projection", total_projection)?;
    validate_finite("bookmaker_line", bookmaker_line)?;
    validate_threshold(threshold)?;

    let edge = total_projection - bookmaker_line;
    let classification = classify(edge, threshold);

    Ok(EdgeSignal {
        edge,
        classification,
    })
}

fn classify(edge: f64, threshold: f64) -> SignalClass {
    if edge.abs() < threshold {
        SignalClass::Neutral
    } else if edge > 0.0 {
        SignalClass::Over
    } else {
        SignalClass::Under
    }
}

/// Nearest half point, used as the default line offered to the user
pub fn suggested_line(total_projection: f64) -> f64 {
    (total_projection * 2.0).round() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_signal() {
        let signal = evaluate_edge(25.0, 22.5, 2.0).unwrap();
        assert!((signal.edge - 2.5).abs() < 1e-9);
        assert_eq!(signal.classification, SignalClass::Over);
    }

    #[test]
    fn test_under_signal() {
        let signal = evaluate_edge(21.0, 24.0, 2.0).unwrap();
        assert!((signal.edge + 3.0).abs() < 1e-9);
        assert_eq!(signal.classification, SignalClass::Under);
    }

    #[test]
    fn test_exact_threshold_is_not_neutral() {
        assert_eq!(
            evaluate_edge(24.5, 22.5, 2.0).unwrap().classification,
            SignalClass::Over
        );
        assert_eq!(
            evaluate_edge(22.5, 24.5, 2.0).unwrap().classification,
            SignalClass::Under
        );
    }

    #[test]
    fn test_neutral_iff_below_threshold() {
        for threshold in [0.5, 1.5, 1.8, 2.0, 3.0] {
            for step in -40..=40 {
                let edge = step as f64 * 0.25;
                let signal = evaluate_edge(22.0 + edge, 22.0, threshold).unwrap();
                let neutral = signal.classification == SignalClass::Neutral;
                assert_eq!(neutral, signal.edge.abs() < threshold, "edge {}", edge);
            }
        }
    }

    #[test]
    fn test_zero_edge_is_neutral() {
        let signal = evaluate_edge(23.0, 23.0, 0.1).unwrap();
        assert_eq!(signal.classification, SignalClass::Neutral);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            evaluate_edge(f64::NAN, 22.5, 2.0),
            Err(ProjectionError::InvalidInput(_))
        ));
        assert!(matches!(
            evaluate_edge(25.0, f64::INFINITY, 2.0),
            Err(ProjectionError::InvalidInput(_))
        ));
        assert!(evaluate_edge(25.0, 22.5, 0.0).is_err());
        assert!(evaluate_edge(25.0, 22.5, -2.0).is_err());
    }

    #[test]
    fn test_suggested_line() {
        assert_eq!(suggested_line(24.3), 24.5);
        assert_eq!(suggested_line(24.2), 24.0);
        assert_eq!(suggested_line(25.0), 25.0);
    }
}
