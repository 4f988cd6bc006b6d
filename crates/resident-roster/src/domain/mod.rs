//! Immutable scheduling facts: residents, shifts, availability and rotations.

pub mod calendar;
mod employee;
mod shift;
mod snapshot;

pub use employee::{Availability, AvailabilityType, Employee, ResidentLevel, Rotation};
pub use shift::{Location, Shift, ShiftId};
pub use snapshot::ScheduleSnapshot;

use chrono::{NaiveDate, NaiveDateTime};

/// Malformed facts. These are configuration errors, never score outcomes.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("unknown shift location '{0}'")]
    UnknownLocation(String),
    #[error("shift {shift} must end after it starts (start {start}, end {end})")]
    InvalidShiftWindow {
        shift: ShiftId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("employee '{0}' appears more than once")]
    DuplicateEmployee(String),
    #[error("shift {0} appears more than once")]
    DuplicateShift(ShiftId),
    #[error("shift {shift} is assigned to unknown employee '{employee}'")]
    UnknownAssignee { shift: ShiftId, employee: String },
    #[error("availability on {date} references unknown employee '{employee}'")]
    UnknownAvailabilityEmployee { employee: String, date: NaiveDate },
    #[error("no shift with id {0}")]
    UnknownShift(ShiftId),
    #[error("no employee named '{0}'")]
    UnknownEmployee(String),
}
