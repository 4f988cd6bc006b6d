use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::calendar::{ends_on, is_ir_block, starts_at, starts_on};
use crate::domain::Shift;

use super::super::blocks::{starting_between, starting_on};
use super::super::config::ScoringConfig;
use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::{employee_of, ScoringRule};

const MINIMUM_REST_HOURS: i64 = 10;
const PERIOD_DAYS: i64 = 28;
const PERIOD_LIMIT_MINUTES: i64 = 320 * 60;

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(MinimumRestBetweenShifts),
        Box::new(FourWeekWorkingHours),
        Box::new(BlockAfterSundayEdCover),
    ]
}

/// Gap of fewer than ten whole hours between the end of one shift and the
/// start of a later one. An IR block may be followed by an evening shift.
struct MinimumRestBetweenShifts;

impl ScoringRule for MinimumRestBetweenShifts {
    fn id(&self) -> RuleId {
        RuleId::MinimumRestBetweenShifts
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        let Some(name) = employee_of(key) else {
            return;
        };
        let evening = ctx.config().evening_start;
        let shifts = ctx.shifts_of(name);
        for first in &shifts {
            let window_end = first.end + Duration::hours(MINIMUM_REST_HOURS);
            for second in starting_between(&shifts, first.end, window_end) {
                if is_ir_block(first) && starts_at(second, evening) {
                    continue;
                }
                let hours = (second.start - first.end).num_hours();
                out.push(
                    ScoreComponent::penalty(
                        self.id(),
                        MINIMUM_REST_HOURS - hours,
                        format!("{name} rests {hours}h between {} and {}", first.id, second.id),
                    )
                    .with_shifts([first.id, second.id])
                    .with_employee(name),
                );
            }
        }
    }
}

/// Counted minutes over each 28-day period starting July 1.
struct FourWeekWorkingHours;

impl FourWeekWorkingHours {
    fn counted_minutes(shift: &Shift, config: &ScoringConfig) -> i64 {
        if starts_at(shift, config.night_start) {
            60 * 60
        } else if is_ir_block(shift) {
            30 * 60
        } else {
            shift.duration_minutes()
        }
    }

    /// Academic year and period index of a date.
    fn period_of(date: NaiveDate) -> (i32, i64) {
        let year = if date.month() >= 7 {
            date.year()
        } else {
            date.year() - 1
        };
        let anchor = NaiveDate::from_ymd_opt(year, 7, 1).unwrap_or(date);
        (year, (date - anchor).num_days() / PERIOD_DAYS)
    }
}

impl ScoringRule for FourWeekWorkingHours {
    fn id(&self) -> RuleId {
        RuleId::FourWeekWorkingHours
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        let Some(name) = employee_of(key) else {
            return;
        };
        let mut periods: BTreeMap<(i32, i64), (i64, Vec<&Shift>)> = BTreeMap::new();
        for shift in ctx.shifts_of(name) {
            let entry = periods.entry(Self::period_of(shift.start.date())).or_default();
            entry.0 += Self::counted_minutes(shift, ctx.config());
            entry.1.push(shift);
        }
        for ((year, index), (minutes, shifts)) in periods {
            if minutes <= PERIOD_LIMIT_MINUTES {
                continue;
            }
            out.push(
                ScoreComponent::penalty(
                    self.id(),
                    (minutes - PERIOD_LIMIT_MINUTES) / 60,
                    format!(
                        "{name} works {}h in period {} of {year}-{}",
                        minutes / 60,
                        index + 1,
                        year + 1
                    ),
                )
                .with_shifts(shifts.iter().map(|shift| shift.id))
                .with_employee(name),
            );
        }
    }
}

/// A 24-hour Sunday shift ending Monday, followed by an IR block that starts
/// the same Monday.
struct BlockAfterSundayEdCover;

impl BlockAfterSundayEdCover {
    fn is_sunday_call(shift: &Shift) -> bool {
        starts_on(shift, Weekday::Sun)
            && ends_on(shift, Weekday::Mon)
            && shift.duration() == Duration::hours(24)
    }
}

impl ScoringRule for BlockAfterSundayEdCover {
    fn id(&self) -> RuleId {
        RuleId::BlockAfterSundayEdCover
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        Self::is_sunday_call(shift) || is_ir_block(shift)
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        let Some(name) = employee_of(key) else {
            return;
        };
        let shifts = ctx.shifts_of(name);
        for sunday in shifts.iter().filter(|shift| Self::is_sunday_call(shift)) {
            for block in starting_on(&shifts, sunday.end.date())
                .iter()
                .filter(|shift| is_ir_block(shift) && shift.start >= sunday.end)
            {
                out.push(
                    ScoreComponent::penalty(
                        self.id(),
                        1,
                        format!("IR block {} starts after Sunday call {}", block.id, sunday.id),
                    )
                    .with_shifts([sunday.id, block.id])
                    .with_employee(name),
                );
            }
        }
    }
}
