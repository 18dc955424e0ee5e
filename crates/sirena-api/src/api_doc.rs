//! OpenAPI documentation definition

use crate::error::ErrorResponse;
use crate::handlers::cases::{DeleteAllResponse, DeleteResponse};
use sirena_core::models::{CaseResponse, GpsCoords};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sirena API",
        description = "Emergency audio report intake and triage"
    ),
    paths(
        crate::handlers::ingest::upload_case,
        crate::handlers::cases::list_cases,
        crate::handlers::cases::get_case,
        crate::handlers::cases::delete_case,
        crate::handlers::cases::delete_all_cases,
    ),
    components(schemas(
        CaseResponse,
        GpsCoords,
        ErrorResponse,
        DeleteResponse,
        DeleteAllResponse
    )),
    tags(
        (name = "cases", description = "Emergency case intake, retrieval, and deletion")
    )
)]
pub struct ApiDoc;
