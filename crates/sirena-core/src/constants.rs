//! Shared constants for the intake pipeline and read paths.

/// Transcript substituted when the transcription stage fails or times out.
pub const FALLBACK_TRANSCRIPT: &str = "Unknown emergency";

/// Display label substituted when the final label would otherwise be empty.
pub const FALLBACK_LABEL: &str = "Emergency call";

/// Severity score written when the severity stage fails or returns an
/// out-of-range or non-numeric response.
pub const DEFAULT_SCORE: f64 = 5.0;

/// Inclusive bounds for an accepted severity response.
pub const SCORE_MIN: f64 = 1.0;
pub const SCORE_MAX: f64 = 10.0;

/// Severity assumed when reading a legacy record with no stored score.
pub const READ_FALLBACK_SCORE: f64 = 10.0;

/// Maximum number of characters of raw transcript kept as the label when the
/// summarization stage fails.
pub const SUMMARY_FALLBACK_CHARS: usize = 50;

/// Extension assumed when an upload carries no usable MIME type.
pub const DEFAULT_MEDIA_EXTENSION: &str = "webm";
