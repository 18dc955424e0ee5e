//! External inference capabilities consumed by the intake pipeline.
//!
//! Two narrow traits model the consumed interfaces: [`Transcriber`] turns
//! audio bytes into text and [`Completer`] answers a role-scoped instruction
//! with plain text. Both are implemented by [`OpenAiClient`] against an
//! OpenAI-compatible API. Failures are opaque `InferenceError`s; the intake
//! pipeline, not this crate, decides the fallback behavior.

mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::OpenAiClient;

/// Inference call errors
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Empty response from upstream")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Speech-to-text capability.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the given audio bytes, in English.
    ///
    /// `filename` carries the format hint (its extension reflects the upload's
    /// MIME subtype).
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        content_type: &str,
        filename: &str,
    ) -> Result<String, InferenceError>;
}

/// Text-completion capability.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Complete `prompt` under the given system instruction, returning plain text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, InferenceError>;
}
