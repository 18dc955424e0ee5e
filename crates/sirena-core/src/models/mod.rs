mod case;

pub use case::{CaseRecord, CaseResponse, GpsCoords, NewCase};
