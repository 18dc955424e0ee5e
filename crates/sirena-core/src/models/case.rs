use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// GPS coordinates attached to a case. Both components default to 0 when the
/// submission carries no (or unparseable) location fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GpsCoords {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for GpsCoords {
    fn default() -> Self {
        GpsCoords {
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

/// A persisted emergency case.
///
/// Media references are relative forward-slash paths under the media root so
/// records stay portable across deployments. Records are immutable after
/// creation; `updated_at` is store-managed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: Uuid,
    pub voice: Option<String>,
    pub video: Option<String>,
    pub text: String,
    pub gps_coords: GpsCoords,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for creating a case. The intake pipeline always supplies every
/// field (fallback values included); the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewCase {
    pub voice: Option<String>,
    pub video: Option<String>,
    pub text: String,
    pub gps_coords: GpsCoords,
    pub score: f64,
}

/// Canonical wire projection of a case record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseResponse {
    pub id: Uuid,
    pub voice: Option<String>,
    pub video: Option<String>,
    pub gps_coords: GpsCoords,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub text: String,
}

impl From<CaseRecord> for CaseResponse {
    fn from(case: CaseRecord) -> Self {
        CaseResponse {
            id: case.id,
            voice: case.voice,
            video: case.video,
            gps_coords: case.gps_coords,
            score: case.score,
            created_at: case.created_at,
            updated_at: case.updated_at,
            text: case.text,
        }
    }
}
