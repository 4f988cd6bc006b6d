use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::{
    Availability, AvailabilityType, Employee, Location, ResidentLevel, ScheduleSnapshot, Shift,
};
use crate::scoring::{HardMediumSoftScore, RuleId, ScoringConfig, ScoringEngine};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

pub(super) fn shift(id: u64, start: NaiveDateTime, hours: i64, location: Location) -> Shift {
    Shift::new(id, start, start + Duration::hours(hours), location, "RESIDENT")
        .expect("valid shift window")
}

pub(super) fn assigned(
    id: u64,
    start: NaiveDateTime,
    hours: i64,
    location: Location,
    employee: &str,
) -> Shift {
    shift(id, start, hours, location).assigned_to(employee)
}

pub(super) fn resident(name: &str, level: ResidentLevel) -> Employee {
    Employee::new(name, level)
}

pub(super) fn unavailable(employee: &str, on: NaiveDate) -> Availability {
    Availability::new(employee, on, AvailabilityType::Unavailable)
}

pub(super) fn snapshot(employees: Vec<Employee>, shifts: Vec<Shift>) -> ScheduleSnapshot {
    ScheduleSnapshot::new(employees, shifts)
}

/// Engine with only the listed rules registered.
pub(super) fn engine_with(rules: &[RuleId]) -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default().only(rules.iter().copied()))
}

pub(super) fn rule_score(rule: RuleId, snapshot: &ScheduleSnapshot) -> HardMediumSoftScore {
    engine_with(&[rule])
        .score(snapshot)
        .expect("snapshot is valid")
}

/// Weekly night-float shifts, Sunday 20:00 to Friday 08:00, starting on `first_sunday`.
pub(super) fn night_weeks(
    first_id: u64,
    first_sunday: NaiveDate,
    weeks: u32,
    employee: &str,
) -> Vec<Shift> {
    (0..weeks)
        .map(|week| {
            let start = (first_sunday + Duration::weeks(i64::from(week)))
                .and_hms_opt(20, 0, 0)
                .expect("valid time");
            assigned(first_id + u64::from(week), start, 108, Location::NightShift, employee)
        })
        .collect()
}
