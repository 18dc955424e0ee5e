//! End-to-end tests for the intake pipeline, driven against stub inference
//! capabilities, an in-memory case store, and a tempdir media root.

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{FromRequest, Multipart};
use axum::http::Request;
use bytes::Bytes;
use chrono::Utc;
use sirena_api::services::intake::{read_submission, IntakeService, MediaPart, Submission};
use sirena_core::models::{CaseRecord, NewCase};
use sirena_core::AppError;
use sirena_db::CaseStore;
use sirena_inference::{Completer, InferenceError, Transcriber};
use sirena_storage::{LocalMediaStore, MediaStore};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use uuid::Uuid;

#[derive(Clone)]
enum StubOutcome {
    Succeed(&'static str),
    Fail,
}

impl StubOutcome {
    fn resolve(&self) -> Result<String, InferenceError> {
        match self {
            StubOutcome::Succeed(text) => Ok(text.to_string()),
            StubOutcome::Fail => Err(InferenceError::Api {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }
}

struct StubTranscriber(StubOutcome);

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(
        &self,
        _audio: Vec<u8>,
        _content_type: &str,
        _filename: &str,
    ) -> Result<String, InferenceError> {
        self.0.resolve()
    }
}

/// Routes by prompt: the severity template asks for a score, the
/// summarization template asks for three words.
struct StubCompleter {
    severity: StubOutcome,
    summary: StubOutcome,
}

#[async_trait]
impl Completer for StubCompleter {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, InferenceError> {
        if prompt.contains("severity score") {
            self.severity.resolve()
        } else {
            self.summary.resolve()
        }
    }
}

#[derive(Default)]
struct InMemoryCaseStore {
    cases: Mutex<Vec<CaseRecord>>,
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn insert(&self, new_case: NewCase) -> Result<CaseRecord, AppError> {
        let now = Utc::now();
        let record = CaseRecord {
            id: Uuid::new_v4(),
            voice: new_case.voice,
            video: new_case.video,
            text: new_case.text,
            gps_coords: new_case.gps_coords,
            score: new_case.score,
            created_at: now,
            updated_at: now,
        };
        self.cases.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<CaseRecord>, AppError> {
        let mut records = self.cases.lock().unwrap().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<CaseRecord, AppError> {
        self.cases
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Case {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> Result<CaseRecord, AppError> {
        let mut cases = self.cases.lock().unwrap();
        let position = cases
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Case {} not found", id)))?;
        Ok(cases.remove(position))
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut cases = self.cases.lock().unwrap();
        let count = cases.len() as u64;
        cases.clear();
        Ok(count)
    }
}

struct Harness {
    service: IntakeService,
    cases: Arc<InMemoryCaseStore>,
    media: Arc<LocalMediaStore>,
    // Held so the tempdir outlives the store.
    media_dir: TempDir,
}

async fn harness(
    transcription: StubOutcome,
    severity: StubOutcome,
    summary: StubOutcome,
) -> Harness {
    let media_dir = tempdir().unwrap();
    let media = Arc::new(LocalMediaStore::new(media_dir.path()).await.unwrap());
    let cases = Arc::new(InMemoryCaseStore::default());

    let service = IntakeService::new(
        media.clone(),
        cases.clone(),
        Arc::new(StubTranscriber(transcription)),
        Arc::new(StubCompleter { severity, summary }),
        Duration::from_secs(5),
    );

    Harness {
        service,
        cases,
        media,
        media_dir,
    }
}

fn voice_submission(latitude: Option<&str>, longitude: Option<&str>) -> Submission {
    Submission {
        voice: Some(MediaPart {
            data: Bytes::from_static(b"fake audio bytes"),
            content_type: Some("audio/webm;codecs=opus".to_string()),
        }),
        video: None,
        latitude: latitude.map(str::to_string),
        longitude: longitude.map(str::to_string),
    }
}

#[tokio::test]
async fn test_ingest_with_all_stages_succeeding() {
    let h = harness(
        StubOutcome::Succeed("There is a fire on Main Street"),
        StubOutcome::Succeed("3"),
        StubOutcome::Succeed("House fire"),
    )
    .await;

    let record = h
        .service
        .ingest(voice_submission(Some("40.71"), Some("-74.00")))
        .await
        .unwrap();

    assert_eq!(record.text, "House fire");
    assert_eq!(record.score, 3.0);
    assert_eq!(record.gps_coords.latitude, 40.71);
    assert_eq!(record.gps_coords.longitude, -74.0);

    let voice_key = record.voice.as_deref().unwrap();
    assert!(voice_key.starts_with("voice/"));
    assert!(voice_key.ends_with(".webm"));
    assert!(h.media.exists(voice_key).await.unwrap());
    assert!(record.video.is_none());
}

#[tokio::test]
async fn test_missing_audio_rejected_with_no_writes() {
    let h = harness(
        StubOutcome::Succeed("unused"),
        StubOutcome::Succeed("3"),
        StubOutcome::Succeed("unused"),
    )
    .await;

    let submission = Submission {
        voice: None,
        video: Some(MediaPart {
            data: Bytes::from_static(b"video without audio"),
            content_type: Some("video/mp4".to_string()),
        }),
        latitude: None,
        longitude: None,
    };

    let err = h.service.ingest(submission).await.unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
    assert_eq!(err.http_status_code(), 400);

    // No record and no media file may exist after a rejected submission.
    assert!(h.cases.list().await.unwrap().is_empty());
    let voice_dir = h.media_dir.path().join("voice");
    let video_dir = h.media_dir.path().join("video");
    assert_eq!(std::fs::read_dir(voice_dir).unwrap().count(), 0);
    assert_eq!(std::fs::read_dir(video_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_mixed_stage_failures_yield_degraded_record() {
    // Transcription fails, severity succeeds with "7", summarization fails.
    let h = harness(
        StubOutcome::Fail,
        StubOutcome::Succeed("7"),
        StubOutcome::Fail,
    )
    .await;

    let record = h
        .service
        .ingest(voice_submission(Some("40.71"), Some("-74.00")))
        .await
        .unwrap();

    // Summarization fallback is the first 50 chars of the fallback transcript.
    assert_eq!(record.text, "Unknown emergency");
    assert!(record.text.chars().count() <= 50);
    assert_eq!(record.score, 7.0);
    assert_eq!(record.gps_coords.latitude, 40.71);
    assert_eq!(record.gps_coords.longitude, -74.0);
}

#[tokio::test]
async fn test_all_stages_failing_still_creates_record() {
    let h = harness(StubOutcome::Fail, StubOutcome::Fail, StubOutcome::Fail).await;

    let record = h.service.ingest(voice_submission(None, None)).await.unwrap();

    assert_eq!(record.text, "Unknown emergency");
    assert_eq!(record.score, 5.0);
    assert!((1.0..=10.0).contains(&record.score));
}

#[tokio::test]
async fn test_invalid_severity_response_defaults_to_five() {
    let h = harness(
        StubOutcome::Succeed("Cat stuck in a tree"),
        StubOutcome::Succeed("probably an 11 out of 10"),
        StubOutcome::Succeed("Cat rescue"),
    )
    .await;

    let record = h.service.ingest(voice_submission(None, None)).await.unwrap();
    assert_eq!(record.score, 5.0);
}

#[tokio::test]
async fn test_out_of_range_severity_defaults_to_five() {
    let h = harness(
        StubOutcome::Succeed("Minor scrape"),
        StubOutcome::Succeed("42"),
        StubOutcome::Succeed("Minor scrape"),
    )
    .await;

    let record = h.service.ingest(voice_submission(None, None)).await.unwrap();
    assert_eq!(record.score, 5.0);
}

#[tokio::test]
async fn test_summary_failure_truncates_long_transcript() {
    let transcript = "A very long emergency description that definitely exceeds the fifty \
                      character fallback limit";
    let h = harness(
        StubOutcome::Succeed(transcript),
        StubOutcome::Succeed("4"),
        StubOutcome::Fail,
    )
    .await;

    let record = h.service.ingest(voice_submission(None, None)).await.unwrap();
    assert_eq!(record.text.chars().count(), 50);
    assert!(transcript.starts_with(&record.text));
}

#[tokio::test]
async fn test_empty_summary_falls_back_to_constant_label() {
    let h = harness(
        StubOutcome::Succeed("Noise complaint"),
        StubOutcome::Succeed("9"),
        StubOutcome::Succeed("  "),
    )
    .await;

    let record = h.service.ingest(voice_submission(None, None)).await.unwrap();
    assert_eq!(record.text, "Emergency call");
}

#[tokio::test]
async fn test_missing_location_defaults_to_zero() {
    let h = harness(
        StubOutcome::Succeed("Flooding in the basement"),
        StubOutcome::Succeed("6"),
        StubOutcome::Succeed("Basement flooding"),
    )
    .await;

    let record = h.service.ingest(voice_submission(None, None)).await.unwrap();
    assert_eq!(record.gps_coords.latitude, 0.0);
    assert_eq!(record.gps_coords.longitude, 0.0);
}

#[tokio::test]
async fn test_video_part_is_stored_alongside_voice() {
    let h = harness(
        StubOutcome::Succeed("Car crash at the intersection"),
        StubOutcome::Succeed("2"),
        StubOutcome::Succeed("Car crash"),
    )
    .await;

    let mut submission = voice_submission(None, None);
    submission.video = Some(MediaPart {
        data: Bytes::from_static(b"fake video bytes"),
        content_type: Some("video/mp4".to_string()),
    });

    let record = h.service.ingest(submission).await.unwrap();

    let video_key = record.video.as_deref().unwrap();
    assert!(video_key.starts_with("video/"));
    assert!(video_key.ends_with(".mp4"));
    assert!(h.media.exists(video_key).await.unwrap());
}

/// A multipart form as an extractor, for driving the submission decoder the
/// way a real request would.
async fn multipart_from(boundary: &str, parts: &[&str]) -> Multipart {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{}\r\n{}\r\n", boundary, part));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    Multipart::from_request(request, &()).await.unwrap()
}

#[tokio::test]
async fn test_unknown_file_field_does_not_abort_submission() {
    let boundary = "sirena-test-boundary";
    let multipart = multipart_from(
        boundary,
        &[
            "Content-Disposition: form-data; name=\"screenshot\"; filename=\"shot.png\"\r\n\
             Content-Type: image/png\r\n\r\nnot really a png",
            "Content-Disposition: form-data; name=\"voice\"; filename=\"clip.webm\"\r\n\
             Content-Type: audio/webm\r\n\r\nfake audio bytes",
            "Content-Disposition: form-data; name=\"latitude\"\r\n\r\n40.71",
        ],
    )
    .await;

    let submission = read_submission(multipart).await.unwrap();

    // The unrecognized file field is dropped; the rest of the form survives.
    assert_eq!(
        submission.voice.as_ref().unwrap().data.as_ref(),
        b"fake audio bytes"
    );
    assert_eq!(
        submission.voice.as_ref().unwrap().content_type.as_deref(),
        Some("audio/webm")
    );
    assert!(submission.video.is_none());
    assert_eq!(submission.latitude.as_deref(), Some("40.71"));

    let h = harness(
        StubOutcome::Succeed("There is a fire on Main Street"),
        StubOutcome::Succeed("3"),
        StubOutcome::Succeed("House fire"),
    )
    .await;

    let record = h.service.ingest(submission).await.unwrap();
    assert_eq!(record.text, "House fire");
    assert_eq!(record.gps_coords.latitude, 40.71);
}

#[tokio::test]
async fn test_round_trip_ingest_then_get() {
    let h = harness(
        StubOutcome::Succeed("Gas leak near the school"),
        StubOutcome::Succeed("1"),
        StubOutcome::Succeed("Gas leak"),
    )
    .await;

    let created = h
        .service
        .ingest(voice_submission(Some("51.50"), Some("-0.12")))
        .await
        .unwrap();
    let fetched = h.cases.get(created.id).await.unwrap();

    assert_eq!(fetched.voice, created.voice);
    assert_eq!(fetched.video, created.video);
    assert_eq!(fetched.gps_coords, created.gps_coords);
    assert_eq!(fetched.score, created.score);
    assert_eq!(fetched.text, created.text);
}

#[tokio::test]
async fn test_delete_is_idempotent_in_outcome() {
    let h = harness(
        StubOutcome::Succeed("Stuck elevator"),
        StubOutcome::Succeed("8"),
        StubOutcome::Succeed("Stuck elevator"),
    )
    .await;

    let record = h.service.ingest(voice_submission(None, None)).await.unwrap();

    assert!(h.cases.delete(record.id).await.is_ok());
    let err = h.cases.delete(record.id).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_all_on_empty_store_returns_zero() {
    let h = harness(
        StubOutcome::Succeed("unused"),
        StubOutcome::Succeed("5"),
        StubOutcome::Succeed("unused"),
    )
    .await;

    assert_eq!(h.cases.delete_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let h = harness(
        StubOutcome::Succeed("Report"),
        StubOutcome::Succeed("5"),
        StubOutcome::Succeed("Report"),
    )
    .await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let record = h.service.ingest(voice_submission(None, None)).await.unwrap();
        ids.push(record.id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let listed: Vec<Uuid> = h.cases.list().await.unwrap().iter().map(|c| c.id).collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
}
