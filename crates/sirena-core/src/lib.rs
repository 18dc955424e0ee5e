//! Sirena Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! shared constants used across all Sirena components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
