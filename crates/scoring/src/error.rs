//! Error kinds raised by the scoring engine.

use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Errors that can occur while scoring candidates.
///
/// An empty candidate list or a selection that keeps nothing is reported
/// through [`Outcome::NotFound`](crate::recommend::Outcome), not as an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoringError {
    /// A required role maps to no skills, so its coverage ratio is undefined.
    ///
    /// Raised both for roles absent from the taxonomy and for roles whose
    /// mapping is present but empty.
    #[error("Role '{role}' has no mapped skills; its coverage cannot be computed")]
    DegenerateRoleMapping {
        /// The offending role name.
        role: String,
    },

    /// The embedding collaborator failed, timed out, or returned garbage.
    #[error("Embedding service unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),

    /// A tunable parameter was outside its accepted range.
    #[error("Invalid parameter '{name}': {value} ({expected})")]
    InvalidParameter {
        /// Parameter name as it appears on the wire.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The skill vocabulary or role table could not be loaded.
    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),
}

impl ScoringError {
    /// True when the error was caused by caller-supplied input rather than by
    /// an external collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DegenerateRoleMapping { .. } | Self::InvalidParameter { .. }
        )
    }
}

/// Result alias used throughout the scoring crate.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Check that `value` is a finite number in `[0, 1]`.
pub(crate) fn ensure_unit_interval(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ScoringError::InvalidParameter {
            name,
            value,
            expected: "expected a number in [0, 1]",
        })
    }
}

/// Check that `value` is finite and not negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ScoringError::InvalidParameter {
            name,
            value,
            expected: "expected a finite, non-negative number",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_interval_accepts_bounds() {
        assert_eq!(ensure_unit_interval("p", 0.0).unwrap(), 0.0);
        assert_eq!(ensure_unit_interval("p", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn unit_interval_rejects_out_of_range_and_nan() {
        assert!(ensure_unit_interval("p", 1.01).is_err());
        assert!(ensure_unit_interval("p", -0.1).is_err());
        assert!(ensure_unit_interval("p", f64::NAN).is_err());
    }

    #[test]
    fn non_negative_rejects_infinity() {
        assert!(ensure_non_negative("alpha", f64::INFINITY).is_err());
        assert!(ensure_non_negative("alpha", -1.0).is_err());
        assert_eq!(ensure_non_negative("alpha", 2.5).unwrap(), 2.5);
    }

    #[test]
    fn client_errors_are_classified() {
        let err = ScoringError::DegenerateRoleMapping {
            role: "Ghost".into(),
        };
        assert!(err.is_client_error());
        assert!(err.to_string().contains("Ghost"));

        let err = ScoringError::EmbeddingUnavailable(EmbeddingError::Timeout { millis: 10 });
        assert!(!err.is_client_error());
    }
}
