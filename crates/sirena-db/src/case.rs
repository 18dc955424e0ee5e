use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sirena_core::constants::{FALLBACK_TRANSCRIPT, READ_FALLBACK_SCORE};
use sirena_core::models::{CaseRecord, GpsCoords, NewCase};
use sirena_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Raw `cases` row.
///
/// Label, score, and coordinates are nullable to tolerate older or partial
/// documents; `into_record` applies the defensive-read defaults.
#[derive(Debug, sqlx::FromRow)]
pub struct CaseRow {
    pub id: Uuid,
    pub voice: Option<String>,
    pub video: Option<String>,
    pub text: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaseRow {
    /// Convert to a domain record, defaulting missing legacy fields.
    ///
    /// These read-time defaults (`text` -> "Unknown emergency", `score` -> 10,
    /// coordinates -> 0) are deliberately distinct from the write-time
    /// defaults applied by the intake pipeline.
    pub fn into_record(self) -> CaseRecord {
        CaseRecord {
            id: self.id,
            voice: self.voice,
            video: self.video,
            text: self
                .text
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| FALLBACK_TRANSCRIPT.to_string()),
            gps_coords: GpsCoords {
                latitude: self.latitude.unwrap_or(0.0),
                longitude: self.longitude.unwrap_or(0.0),
            },
            score: self.score.unwrap_or(READ_FALLBACK_SCORE),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Case document store.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Insert a new case; the store assigns id and timestamps.
    async fn insert(&self, new_case: NewCase) -> Result<CaseRecord, AppError>;

    /// All cases, newest first.
    async fn list(&self) -> Result<Vec<CaseRecord>, AppError>;

    /// A single case by id.
    async fn get(&self, id: Uuid) -> Result<CaseRecord, AppError>;

    /// Delete a case by id, returning the deleted record.
    async fn delete(&self, id: Uuid) -> Result<CaseRecord, AppError>;

    /// Delete every case, returning the number removed.
    async fn delete_all(&self) -> Result<u64, AppError>;
}

/// Postgres-backed case store.
#[derive(Clone)]
pub struct PgCaseStore {
    pool: PgPool,
}

impl PgCaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Case {} not found", id))
    }
}

#[async_trait]
impl CaseStore for PgCaseStore {
    async fn insert(&self, new_case: NewCase) -> Result<CaseRecord, AppError> {
        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            INSERT INTO cases (voice, video, text, latitude, longitude, score)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, voice, video, text, latitude, longitude, score, created_at, updated_at
            "#,
        )
        .bind(&new_case.voice)
        .bind(&new_case.video)
        .bind(&new_case.text)
        .bind(new_case.gps_coords.latitude)
        .bind(new_case.gps_coords.longitude)
        .bind(new_case.score)
        .fetch_one(&self.pool)
        .await?;

        let record = row.into_record();
        tracing::info!(case_id = %record.id, score = record.score, "Case record created");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<CaseRecord>, AppError> {
        let rows = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT id, voice, video, text, latitude, longitude, score, created_at, updated_at
            FROM cases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CaseRow::into_record).collect())
    }

    async fn get(&self, id: Uuid) -> Result<CaseRecord, AppError> {
        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT id, voice, video, text, latitude, longitude, score, created_at, updated_at
            FROM cases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        Ok(row.into_record())
    }

    async fn delete(&self, id: Uuid) -> Result<CaseRecord, AppError> {
        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            DELETE FROM cases
            WHERE id = $1
            RETURNING id, voice, video, text, latitude, longitude, score, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))?;

        tracing::info!(case_id = %id, "Case record deleted");
        Ok(row.into_record())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM cases").execute(&self.pool).await?;
        let deleted = result.rows_affected();
        tracing::info!(deleted_count = deleted, "All case records deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: Option<&str>, score: Option<f64>, lat: Option<f64>) -> CaseRow {
        CaseRow {
            id: Uuid::new_v4(),
            voice: Some("voice/a-1.webm".to_string()),
            video: None,
            text: text.map(str::to_string),
            latitude: lat,
            longitude: lat.map(|v| -v),
            score,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_record_keeps_stored_fields() {
        let record = row(Some("Gas leak"), Some(2.0), Some(40.71)).into_record();
        assert_eq!(record.text, "Gas leak");
        assert_eq!(record.score, 2.0);
        assert_eq!(record.gps_coords.latitude, 40.71);
        assert_eq!(record.gps_coords.longitude, -40.71);
    }

    #[test]
    fn test_into_record_defaults_missing_legacy_fields() {
        let record = row(None, None, None).into_record();
        assert_eq!(record.text, "Unknown emergency");
        assert_eq!(record.score, 10.0);
        assert_eq!(record.gps_coords, GpsCoords::default());
    }

    #[test]
    fn test_into_record_defaults_empty_text() {
        let record = row(Some(""), Some(5.0), None).into_record();
        assert_eq!(record.text, "Unknown emergency");
    }
}
