use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sirena_core::models::CaseResponse;
use sirena_core::AppError;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResponse {
    pub message: String,
    pub deleted_count: u64,
}

#[utoipa::path(
    get,
    path = "/uploads",
    tag = "cases",
    responses(
        (status = 200, description = "All cases, newest first", body = [CaseResponse]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_cases"))]
pub async fn list_cases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CaseResponse>>, HttpAppError> {
    let records = state.cases.list().await?;
    tracing::debug!(count = records.len(), "Listed case records");
    Ok(Json(records.into_iter().map(CaseResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/uploads/{id}",
    tag = "cases",
    params(("id" = String, Path, description = "Case record id")),
    responses(
        (status = 200, description = "Case record", body = CaseResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such case", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_case"))]
pub async fn get_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, HttpAppError> {
    let id = parse_case_id(&id)?;
    let record = state.cases.get(id).await?;
    Ok(Json(CaseResponse::from(record)))
}

#[utoipa::path(
    delete,
    path = "/uploads/{id}",
    tag = "cases",
    params(("id" = String, Path, description = "Case record id")),
    responses(
        (status = 200, description = "Case deleted", body = DeleteResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such case", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_case"))]
pub async fn delete_case(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let id = parse_case_id(&id)?;
    let record = state.cases.delete(id).await?;

    // Best-effort cascading removal of the referenced media files. A failure
    // here leaves an orphan on disk but never fails the delete request.
    let keys: Vec<String> = record.voice.into_iter().chain(record.video).collect();
    if !keys.is_empty() {
        let media = state.media.clone();
        tokio::spawn(async move {
            for key in keys {
                if let Err(err) = media.delete(&key).await {
                    tracing::warn!(
                        error = %err,
                        key = %key,
                        "Failed to remove media for deleted case"
                    );
                }
            }
        });
    }

    Ok(Json(DeleteResponse {
        message: "Data successfully deleted".to_string(),
        id,
    }))
}

// Administrative/debug operation; deliberately unauthenticated, like the rest
// of the API. Clears records only, not stored media.
#[utoipa::path(
    delete,
    path = "/uploads",
    tag = "cases",
    responses(
        (status = 200, description = "All cases deleted", body = DeleteAllResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_all_cases"))]
pub async fn delete_all_cases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteAllResponse>, HttpAppError> {
    let deleted_count = state.cases.delete_all().await?;
    Ok(Json(DeleteAllResponse {
        message: "Database cleared!".to_string(),
        deleted_count,
    }))
}

/// Malformed ids are a distinct client error from not-found.
fn parse_case_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(AppError::from)
}
