//! Application state.
//!
//! All collaborators are constructed once at startup (see `setup`) and
//! injected here; handlers never reach for global connections.

use crate::services::intake::IntakeService;
use sirena_core::Config;
use sirena_db::CaseStore;
use sirena_storage::MediaStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cases: Arc<dyn CaseStore>,
    pub media: Arc<dyn MediaStore>,
    pub intake: IntakeService,
}
