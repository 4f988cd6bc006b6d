//! Loading schedule facts from files: JSON snapshots and CSV availability exports.

mod availability;
mod snapshot;

pub use availability::AvailabilityCsvImporter;
pub use snapshot::SnapshotImporter;

use crate::domain::ScheduleError;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read roster input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid availability CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("availability row {row}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { row: usize, value: String },
    #[error("availability row {row}: unknown availability type '{value}'")]
    UnknownType { row: usize, value: String },
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
