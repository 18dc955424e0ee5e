//! Media storage for uploaded emergency recordings.
//!
//! Files are addressed by relative keys of the form
//! `{voice|video}/{hex32}-{millis}.{ext}` under a configured media root.
//! Keys always use forward slashes so stored references are portable across
//! deployments and host platforms.

pub mod filename;
mod local;
mod traits;

pub use filename::new_media_filename;
pub use local::LocalMediaStore;
pub use traits::{media_key, MediaKind, MediaStore, StorageError, StorageResult};
