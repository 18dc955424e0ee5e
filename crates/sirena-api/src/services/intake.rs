//! The intake pipeline.
//!
//! Turns a multipart submission (voice recording, optional video, GPS
//! coordinates) into a durable case record: media is persisted first, then
//! transcription runs, then severity scoring and summarization run
//! concurrently against the transcript. Every inference stage is wrapped by
//! the stage runner so its failure degrades the record instead of failing the
//! request; only input validation and the final store write can fail ingest.

use crate::services::score::ScoreOutcome;
use crate::services::stage::{run_stage, StageError};
use axum::extract::Multipart;
use bytes::Bytes;
use sirena_core::constants::{
    DEFAULT_SCORE, FALLBACK_LABEL, FALLBACK_TRANSCRIPT, SUMMARY_FALLBACK_CHARS,
};
use sirena_core::models::{CaseRecord, GpsCoords, NewCase};
use sirena_core::AppError;
use sirena_db::CaseStore;
use sirena_inference::{Completer, Transcriber};
use sirena_storage::{new_media_filename, MediaKind, MediaStore};
use std::sync::Arc;
use std::time::Duration;

const SYSTEM_INSTRUCTION: &str =
    "You are an emergency response assistant. Provide concise, helpful responses.";

/// One uploaded binary part.
#[derive(Debug, Clone)]
pub struct MediaPart {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// A caller-provided emergency report, decoded from multipart form data.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub voice: Option<MediaPart>,
    pub video: Option<MediaPart>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Decode a multipart request into a [`Submission`].
///
/// Recognized fields: `voice`, `video` (binary), `latitude`, `longitude`
/// (decimal strings). An unrecognized binary field is rejected individually
/// and logged; it does not abort the submission as long as the required voice
/// part is present.
pub async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let is_file = field.file_name().is_some();

        match name.as_str() {
            "voice" => {
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read voice upload: {}", e))
                })?;
                submission.voice = Some(MediaPart { data, content_type });
            }
            "video" => {
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read video upload: {}", e))
                })?;
                submission.video = Some(MediaPart { data, content_type });
            }
            "latitude" => submission.latitude = field.text().await.ok(),
            "longitude" => submission.longitude = field.text().await.ok(),
            other if is_file => {
                let err = AppError::UnsupportedMedia(other.to_string());
                tracing::warn!(field = other, error = %err, "Rejecting unsupported upload field");
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(submission)
}

/// Orchestrates one submission end to end.
#[derive(Clone)]
pub struct IntakeService {
    media: Arc<dyn MediaStore>,
    cases: Arc<dyn CaseStore>,
    transcriber: Arc<dyn Transcriber>,
    completer: Arc<dyn Completer>,
    stage_timeout: Duration,
}

impl IntakeService {
    pub fn new(
        media: Arc<dyn MediaStore>,
        cases: Arc<dyn CaseStore>,
        transcriber: Arc<dyn Transcriber>,
        completer: Arc<dyn Completer>,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            media,
            cases,
            transcriber,
            completer,
            stage_timeout,
        }
    }

    /// Run the full pipeline for one submission and persist the case.
    ///
    /// Stored media files are never removed when a later step fails; the raw
    /// evidence survives even if no record is written.
    pub async fn ingest(&self, submission: Submission) -> Result<CaseRecord, AppError> {
        let Submission {
            voice,
            video,
            latitude,
            longitude,
        } = submission;

        let voice =
            voice.ok_or_else(|| AppError::Validation("Voice file missing!".to_string()))?;

        let voice_filename = new_media_filename(voice.content_type.as_deref());
        let voice_key = self
            .media
            .put(MediaKind::Voice, &voice_filename, voice.data.to_vec())
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let video_key = match video {
            Some(part) => {
                let filename = new_media_filename(part.content_type.as_deref());
                let key = self
                    .media
                    .put(MediaKind::Video, &filename, part.data.to_vec())
                    .await
                    .map_err(|e| AppError::Storage(e.to_string()))?;
                Some(key)
            }
            None => None,
        };

        let content_type = voice
            .content_type
            .clone()
            .unwrap_or_else(|| "audio/webm".to_string());
        let transcript = run_stage(
            "transcription",
            self.stage_timeout,
            async {
                self.transcriber
                    .transcribe(voice.data.to_vec(), &content_type, &voice_filename)
                    .await
                    .map_err(StageError::Transcription)
            },
            || FALLBACK_TRANSCRIPT.to_string(),
        )
        .await;

        // Severity and summarization both consume the (possibly fallback)
        // transcript; they have no dependency on each other.
        let (score, summary) = tokio::join!(
            run_stage(
                "severity",
                self.stage_timeout,
                async {
                    let response = self
                        .completer
                        .complete(SYSTEM_INSTRUCTION, &severity_prompt(&transcript))
                        .await
                        .map_err(StageError::Severity)?;
                    Ok::<_, StageError>(ScoreOutcome::parse(&response).value())
                },
                || DEFAULT_SCORE,
            ),
            run_stage(
                "summarization",
                self.stage_timeout,
                async {
                    self.completer
                        .complete(SYSTEM_INSTRUCTION, &summary_prompt(&transcript))
                        .await
                        .map_err(StageError::Summarization)
                },
                || truncate_chars(&transcript, SUMMARY_FALLBACK_CHARS),
            ),
        );

        let text = if summary.trim().is_empty() {
            FALLBACK_LABEL.to_string()
        } else {
            summary
        };

        let new_case = NewCase {
            voice: Some(voice_key),
            video: video_key,
            text,
            gps_coords: GpsCoords {
                latitude: parse_coord(latitude.as_deref()),
                longitude: parse_coord(longitude.as_deref()),
            },
            score,
        };

        // The store write is the single remaining hard-failure point.
        self.cases.insert(new_case).await
    }
}

fn severity_prompt(transcript: &str) -> String {
    format!(
        "give the following emergency: {} a severity score from 1 to 10 according to the \
         american criterias, 1 is the highest, 10 is the lowest, give me a number nothing else",
        transcript
    )
}

fn summary_prompt(transcript: &str) -> String {
    format!(
        "give the following emergency: {} a concise description with no more than three words",
        transcript
    )
}

/// Parse an optional decimal-string coordinate, defaulting to 0.
///
/// Non-finite values (`NaN`, `inf`) also default to 0; they would otherwise
/// serialize as `null` in every response carrying the record.
pub fn parse_coord(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// First `max_chars` characters of `s`, respecting char boundaries.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
