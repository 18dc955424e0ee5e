// OpenAI-compatible client for transcription and chat completion.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::{Completer, InferenceError, Transcriber};
use async_trait::async_trait;

const HTTP_TIMEOUT_SECS: u64 = 300;
const MAX_COMPLETION_TOKENS: u32 = 100;
// Determinism-leaning sampling for consistent triage answers.
const COMPLETION_TEMPERATURE: f64 = 0.3;

/// Client for an OpenAI-compatible inference API.
///
/// The base URL is configurable so tests and self-hosted deployments can
/// point it at a different endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    audio_model: String,
    chat_model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("audio_model", &self.audio_model)
            .field("chat_model", &self.chat_model)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        audio_model: impl Into<String>,
        chat_model: impl Into<String>,
    ) -> Result<Self, InferenceError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(InferenceError::Config(
                "Inference API key is required but not provided".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            audio_model: audio_model.into(),
            chat_model: chat_model.into(),
        })
    }

    async fn error_for_status(response: reqwest::Response) -> InferenceError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        InferenceError::Api { status, body }
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        content_type: &str,
        filename: &str,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", file_part)
            .text("model", self.audio_model.clone())
            .text("language", "en");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let transcription: TranscriptionResponse = response.json().await?;

        tracing::info!(
            text_length = transcription.text.len(),
            "Transcription successful"
        );

        Ok(transcription.text)
    }
}

#[async_trait]
impl Completer for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, InferenceError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": self.chat_model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": MAX_COMPLETION_TOKENS,
            "temperature": COMPLETION_TEMPERATURE,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(InferenceError::EmptyResponse)?;

        tracing::debug!(text_length = content.len(), "Completion successful");

        Ok(content)
    }
}

// Upstream API response types
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}
