//! Sirena API Library
//!
//! HTTP handlers, the intake pipeline, and application setup.

// Module declarations
mod api_doc;
mod handlers;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::intake::IntakeService;
