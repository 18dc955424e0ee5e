pub mod cases;
pub mod ingest;
