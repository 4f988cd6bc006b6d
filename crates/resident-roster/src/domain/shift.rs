use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::ScheduleError;

/// Identifier wrapper for shifts, stable across scoring calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub u64);

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed location vocabulary. The location alone decides which rules see a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "ED cover")]
    EdCover,
    #[serde(rename = "Night Shift")]
    NightShift,
    #[serde(rename = "Day Shift")]
    DayShift,
    #[serde(rename = "IR")]
    Ir,
    #[serde(rename = "Peds")]
    Peds,
}

impl Location {
    pub fn ordered() -> [Location; 5] {
        [
            Location::EdCover,
            Location::NightShift,
            Location::DayShift,
            Location::Ir,
            Location::Peds,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Location::EdCover => "ED cover",
            Location::NightShift => "Night Shift",
            Location::DayShift => "Day Shift",
            Location::Ir => "IR",
            Location::Peds => "Peds",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Location {
    type Err = ScheduleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Location::ordered()
            .into_iter()
            .find(|location| location.label() == value.trim())
            .ok_or_else(|| ScheduleError::UnknownLocation(value.to_string()))
    }
}

/// A time-bounded slot that needs a resident. `employee` is the only field the
/// optimizer changes between scoring calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: Location,
    pub required_skill: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub employee: Option<String>,
}

impl Shift {
    pub fn new(
        id: u64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        location: Location,
        required_skill: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        let shift = Self {
            id: ShiftId(id),
            start,
            end,
            location,
            required_skill: required_skill.into(),
            optional: false,
            employee: None,
        };
        shift.check_window()?;
        Ok(shift)
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn assigned_to(mut self, employee: impl Into<String>) -> Self {
        self.employee = Some(employee.into());
        self
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn is_assigned_to(&self, employee: &str) -> bool {
        self.employee.as_deref() == Some(employee)
    }

    pub(crate) fn check_window(&self) -> Result<(), ScheduleError> {
        if self.end <= self.start {
            return Err(ScheduleError::InvalidShiftWindow {
                shift: self.id,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}-{}", self.id, self.location, self.start, self.end)
    }
}
