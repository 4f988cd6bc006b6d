use std::collections::BTreeMap;

use chrono::Weekday;

use super::views::{ShiftCountRow, UnassignedSummary};
use crate::domain::calendar::{is_ed_cover, is_weekend, starts_at, starts_on};
use crate::domain::{Location, ResidentLevel, ScheduleSnapshot};
use crate::scoring::ScoringConfig;

/// Counters for one resident. `call_shifts` adds evening and weekend starts, so
/// a shift that is both counts twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResidentShiftCounts {
    pub level: Option<ResidentLevel>,
    pub call_shifts: usize,
    pub evening: usize,
    pub weekend: usize,
    pub peds: usize,
    pub night: usize,
    pub day: usize,
    pub ir: usize,
    pub saturday_ed_cover: usize,
    pub sunday_ed_cover: usize,
    pub friday_ed_cover: usize,
    pub by_location: BTreeMap<Location, usize>,
}

#[derive(Debug, Default)]
pub struct ShiftCountReport {
    pub residents: BTreeMap<String, ResidentShiftCounts>,
    pub unassigned_mandatory: usize,
    pub unassigned_optional: usize,
}

impl ShiftCountReport {
    /// Every employee gets a row, including those with no shifts.
    pub fn from_snapshot(snapshot: &ScheduleSnapshot, config: &ScoringConfig) -> Self {
        let mut report = Self::default();
        for employee in &snapshot.employees {
            report
                .residents
                .entry(employee.name.clone())
                .or_default()
                .level = Some(employee.level.clone());
        }

        for shift in &snapshot.shifts {
            let Some(name) = shift.employee.as_deref() else {
                if shift.optional {
                    report.unassigned_optional += 1;
                } else {
                    report.unassigned_mandatory += 1;
                }
                continue;
            };
            let counts = report.residents.entry(name.to_string()).or_default();

            *counts.by_location.entry(shift.location).or_default() += 1;
            match shift.location {
                Location::NightShift => counts.night += 1,
                Location::DayShift => counts.day += 1,
                Location::Ir => counts.ir += 1,
                Location::Peds => counts.peds += 1,
                Location::EdCover => {}
            }
            if is_ed_cover(shift) {
                if starts_on(shift, Weekday::Sat) {
                    counts.saturday_ed_cover += 1;
                } else if starts_on(shift, Weekday::Sun) {
                    counts.sunday_ed_cover += 1;
                } else if starts_on(shift, Weekday::Fri) {
                    counts.friday_ed_cover += 1;
                }
            }
            if starts_at(shift, config.evening_start) {
                counts.call_shifts += 1;
                counts.evening += 1;
            }
            if is_weekend(shift) {
                counts.call_shifts += 1;
                counts.weekend += 1;
            }
        }

        report
    }

    pub fn get(&self, employee: &str) -> Option<&ResidentShiftCounts> {
        self.residents.get(employee)
    }

    /// Rows ordered by level, then name.
    pub fn rows(&self) -> Vec<ShiftCountRow> {
        let mut rows: Vec<ShiftCountRow> = self
            .residents
            .iter()
            .map(|(name, counts)| ShiftCountRow::new(name, counts))
            .collect();
        rows.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.employee.cmp(&b.employee)));
        rows
    }

    pub fn unassigned(&self) -> UnassignedSummary {
        UnassignedSummary {
            mandatory: self.unassigned_mandatory,
            optional: self.unassigned_optional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, Shift};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    fn shift(id: u64, start: NaiveDateTime, hours: i64, location: Location) -> Shift {
        Shift::new(id, start, start + Duration::hours(hours), location, "RESIDENT")
            .expect("valid shift")
    }

    #[test]
    fn counts_follow_start_day_and_time() {
        let snapshot = ScheduleSnapshot::new(
            vec![
                Employee::new("R3a P", ResidentLevel::R3),
                Employee::new("R2a A", ResidentLevel::R2),
                Employee::new("R2b B", ResidentLevel::R2),
            ],
            vec![
                shift(1, at(7, 5, 17), 7, Location::EdCover).assigned_to("R2a A"),
                shift(2, at(7, 6, 8), 24, Location::EdCover).assigned_to("R2a A"),
                shift(3, at(7, 7, 20), 108, Location::NightShift).assigned_to("R2a A"),
                shift(4, at(7, 6, 14), 10, Location::DayShift).assigned_to("R2a A"),
                shift(5, at(8, 5, 8), 14 * 24, Location::Peds).assigned_to("R3a P"),
                shift(6, at(7, 13, 8), 24, Location::EdCover),
                shift(7, at(7, 14, 8), 24, Location::EdCover).optional(),
            ],
        );
        let report = ShiftCountReport::from_snapshot(&snapshot, &ScoringConfig::default());

        let a = report.get("R2a A").expect("R2a A counted");
        assert_eq!(a.friday_ed_cover, 1);
        assert_eq!(a.saturday_ed_cover, 1);
        assert_eq!(a.night, 1);
        assert_eq!(a.day, 1);
        assert_eq!(a.evening, 1);
        // Saturday ED cover, Sunday night start and the Saturday evening.
        assert_eq!(a.weekend, 3);
        assert_eq!(a.call_shifts, 4);
        assert_eq!(a.by_location.get(&Location::EdCover), Some(&2));

        assert_eq!(report.get("R3a P").map(|counts| counts.peds), Some(1));
        assert_eq!(report.get("R2b B"), Some(&ResidentShiftCounts {
            level: Some(ResidentLevel::R2),
            ..ResidentShiftCounts::default()
        }));
        assert_eq!(report.unassigned(), UnassignedSummary { mandatory: 1, optional: 1 });

        let order: Vec<String> = report.rows().into_iter().map(|row| row.employee).collect();
        assert_eq!(order, vec!["R2a A", "R2b B", "R3a P"]);
    }
}
