//! Unified inference-stage runner.
//!
//! Exactly one layer neutralizes inference failures: every external call in
//! the intake pipeline goes through [`run_stage`], which bounds the call with
//! a timeout, logs the stage name and failure, and always returns a value.
//! The stages themselves stay simple and propagate errors normally.

use sirena_inference::InferenceError;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single inference stage. Never surfaced to the caller of the
/// pipeline; absorbed into the stage's documented fallback value.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Transcription failed: {0}")]
    Transcription(#[source] InferenceError),

    #[error("Severity scoring failed: {0}")]
    Severity(#[source] InferenceError),

    #[error("Summarization failed: {0}")]
    Summarization(#[source] InferenceError),
}

/// Run one inference stage, falling back on error or timeout.
///
/// A timeout is treated identically to an upstream failure: both take the
/// fallback path. The fallback is lazy because some fallbacks derive from the
/// transcript.
pub async fn run_stage<T, E, F, FB>(stage: &'static str, limit: Duration, fut: F, fallback: FB) -> T
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
    FB: FnOnce() -> T,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => {
            tracing::debug!(stage = stage, "Stage completed");
            value
        }
        Ok(Err(err)) => {
            tracing::warn!(stage = stage, error = %err, "Stage failed, using fallback");
            fallback()
        }
        Err(_) => {
            tracing::warn!(
                stage = stage,
                timeout_secs = limit.as_secs(),
                "Stage timed out, using fallback"
            );
            fallback()
        }
    }
}
