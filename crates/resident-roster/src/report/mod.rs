//! Per-resident shift counts attached to a scored schedule.

mod counts;
mod views;

pub use counts::{ResidentShiftCounts, ShiftCountReport};
pub use views::{ShiftCountRow, UnassignedSummary};
