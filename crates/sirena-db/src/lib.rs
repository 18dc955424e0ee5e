//! Case persistence for Sirena.
//!
//! [`CaseStore`] is the document-store seam the rest of the application works
//! against; [`PgCaseStore`] is the Postgres implementation. The store is
//! constructed once at startup and injected, so no component reaches for a
//! global connection handle.

mod case;

pub use case::{CaseRow, CaseStore, PgCaseStore};
