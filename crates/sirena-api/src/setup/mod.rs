//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs: tracing,
//! database pool and migrations, media storage, the inference client, and
//! route construction. Collaborators are built once and injected into the
//! state, so connection lifecycle is owned by the process entry point.

pub mod database;
pub mod routes;
pub mod server;

use crate::services::intake::IntakeService;
use crate::state::AppState;
use anyhow::{Context, Result};
use sirena_core::Config;
use sirena_db::{CaseStore, PgCaseStore};
use sirena_inference::{Completer, OpenAiClient, Transcriber};
use sirena_storage::{LocalMediaStore, MediaStore};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    init_tracing();

    tracing::info!(environment = %config.environment, "Configuration loaded");

    // Database pool + migrations
    let pool = database::setup_database(&config).await?;

    // Durable media storage
    let media: Arc<dyn MediaStore> = Arc::new(
        LocalMediaStore::new(config.media_root())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize media storage: {}", e))?,
    );

    // Case document store
    let cases: Arc<dyn CaseStore> = Arc::new(PgCaseStore::new(pool));

    // Inference client (transcription + completion share one client)
    let client = Arc::new(
        OpenAiClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_audio_model,
            &config.openai_chat_model,
        )
        .context("Failed to initialize inference client")?,
    );

    let intake = IntakeService::new(
        media.clone(),
        cases.clone(),
        client.clone() as Arc<dyn Transcriber>,
        client as Arc<dyn Completer>,
        Duration::from_secs(config.stage_timeout_secs()),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        cases,
        media,
        intake,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
