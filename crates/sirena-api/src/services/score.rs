//! Severity response validation.
//!
//! The severity stage asks for a bare number; upstream models do not always
//! oblige. The parse result is tagged so a validation fallback stays
//! distinguishable from a call failure, even though both resolve to the same
//! default score.

use sirena_core::constants::{DEFAULT_SCORE, SCORE_MAX, SCORE_MIN};

/// Outcome of parsing a severity response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    /// The response parsed as a number within [1, 10].
    Parsed(f64),
    /// The response was non-numeric or out of range; the default applies.
    Defaulted(&'static str),
}

impl ScoreOutcome {
    /// Validate a raw severity response.
    pub fn parse(response: &str) -> ScoreOutcome {
        match response.trim().parse::<f64>() {
            Ok(value) if (SCORE_MIN..=SCORE_MAX).contains(&value) => ScoreOutcome::Parsed(value),
            Ok(_) => {
                tracing::warn!(response = %response.trim(), "Severity out of range, using default");
                ScoreOutcome::Defaulted("out of range")
            }
            Err(_) => {
                tracing::warn!(response = %response.trim(), "Non-numeric severity, using default");
                ScoreOutcome::Defaulted("non-numeric")
            }
        }
    }

    /// The score to write.
    pub fn value(&self) -> f64 {
        match self {
            ScoreOutcome::Parsed(value) => *value,
            ScoreOutcome::Defaulted(_) => DEFAULT_SCORE,
        }
    }
}
