use crate::error::{ErrorResponse, HttpAppError};
use crate::services::intake::read_submission;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sirena_core::models::CaseResponse;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "cases",
    responses(
        (status = 201, description = "Case record created", body = CaseResponse),
        (status = 400, description = "Voice file missing or malformed input", body = ErrorResponse),
        (status = 500, description = "Persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "ingest_case"))]
pub async fn upload_case(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let submission = read_submission(multipart).await?;

    tracing::info!(
        has_voice = submission.voice.is_some(),
        has_video = submission.video.is_some(),
        latitude = ?submission.latitude,
        longitude = ?submission.longitude,
        "Received emergency submission"
    );

    let record = state.intake.ingest(submission).await?;

    Ok((StatusCode::CREATED, Json(CaseResponse::from(record))))
}
