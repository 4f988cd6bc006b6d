use chrono::{Datelike, Duration, NaiveTime, Weekday};

use crate::domain::calendar::{
    is_ed_cover, is_ir_block, is_night_float, is_weekend_ed_cover, starts_on,
};
use crate::domain::Shift;

use super::super::blocks::{overlapping_pairs, starting_at, starting_on};
use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::{employee_of, ScoringRule};

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(OverlappingShifts),
        Box::new(EdCoverBeforeNightFloat),
        Box::new(FridayEdCoverBeforeSaturdayShift),
        Box::new(BackToBackWeekendEdCover),
        Box::new(SundayEdCoverAfterNightFloat),
        Box::new(SaturdayEdCoverAfterNightFloat),
        Box::new(ShiftAfterSundayEdCover),
        Box::new(ExcessFridayEdCover),
    ]
}

fn pair_penalty(
    rule: RuleId,
    weight: i64,
    name: &str,
    first: &Shift,
    second: &Shift,
    notes: String,
) -> ScoreComponent {
    ScoreComponent::penalty(rule, weight, notes)
        .with_shifts([first.id, second.id])
        .with_employee(name)
}

fn is_saturday_ed_cover(shift: &Shift) -> bool {
    is_weekend_ed_cover(shift) && starts_on(shift, Weekday::Sat)
}

fn is_sunday_ed_cover(shift: &Shift) -> bool {
    is_weekend_ed_cover(shift) && starts_on(shift, Weekday::Sun)
}

/// Two shifts of one employee whose intervals intersect. An IR block may run
/// alongside ED cover.
struct OverlappingShifts;

impl ScoringRule for OverlappingShifts {
    fn id(&self) -> RuleId {
        RuleId::OverlappingShifts
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
        let shifts = ctx.shifts_of(name);
        for (first, second) in overlapping_pairs(&shifts) {
            let cover_with_block = (is_ed_cover(first) && is_ir_block(second))
                || (is_ir_block(first) && is_ed_cover(second));
            if cover_with_block {
                continue;
            }
            out.push(pair_penalty(
                self.id(),
                2,
                name,
                first,
                second,
                format!("{} overlaps {} for {name}", first.id, second.id),
            ));
        }
    }
}

struct EdCoverBeforeNightFloat;

impl ScoringRule for EdCoverBeforeNightFloat {
    fn id(&self) -> RuleId {
        RuleId::EdCoverBeforeNightFloat
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_ed_cover(shift) || is_night_float(shift)
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
        for cover in shifts.iter().filter(|shift| is_ed_cover(shift)) {
            for night in starting_at(&shifts, cover.end)
                .iter()
                .filter(|shift| is_night_float(shift))
            {
                out.push(pair_penalty(
                    self.id(),
                    1,
                    name,
                    cover,
                    night,
                    format!("ED cover {} ends as night float {} starts", cover.id, night.id),
                ));
            }
        }
    }
}

/// ED cover on a Friday followed by any shift the next day.
struct FridayEdCoverBeforeSaturdayShift;

impl ScoringRule for FridayEdCoverBeforeSaturdayShift {
    fn id(&self) -> RuleId {
        RuleId::FridayEdCoverBeforeSaturdayShift
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        (is_ed_cover(shift) && starts_on(shift, Weekday::Fri)) || starts_on(shift, Weekday::Sat)
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
        for friday in shifts
            .iter()
            .filter(|shift| is_ed_cover(shift) && starts_on(shift, Weekday::Fri))
        {
            let Some(saturday) = friday.start.date().succ_opt() else {
                continue;
            };
            for next in starting_on(&shifts, saturday) {
                out.push(pair_penalty(
                    self.id(),
                    1,
                    name,
                    friday,
                    next,
                    format!("Friday ED cover {} followed by {} on {saturday}", friday.id, next.id),
                ));
            }
        }
    }
}

/// Saturday 24-hour ED cover immediately followed by the Sunday one.
struct BackToBackWeekendEdCover;

impl ScoringRule for BackToBackWeekendEdCover {
    fn id(&self) -> RuleId {
        RuleId::BackToBackWeekendEdCover
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_weekend_ed_cover(shift)
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
        for saturday in shifts.iter().filter(|shift| is_saturday_ed_cover(shift)) {
            for sunday in starting_at(&shifts, saturday.end)
                .iter()
                .filter(|shift| is_sunday_ed_cover(shift))
            {
                out.push(pair_penalty(
                    self.id(),
                    10,
                    name,
                    saturday,
                    sunday,
                    format!("weekend ED cover {} runs straight into {}", saturday.id, sunday.id),
                ));
            }
        }
    }
}

/// Sunday ED cover one day after a night-float block ends, skipping Saturday.
struct SundayEdCoverAfterNightFloat;

impl ScoringRule for SundayEdCoverAfterNightFloat {
    fn id(&self) -> RuleId {
        RuleId::SundayEdCoverAfterNightFloat
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_night_float(shift) || is_sunday_ed_cover(shift)
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
        for night in shifts.iter().filter(|shift| is_night_float(shift)) {
            for sunday in starting_at(&shifts, night.end + Duration::days(1))
                .iter()
                .filter(|shift| is_sunday_ed_cover(shift))
            {
                out.push(pair_penalty(
                    self.id(),
                    1,
                    name,
                    night,
                    sunday,
                    format!("Sunday ED cover {} one day after night float {}", sunday.id, night.id),
                ));
            }
        }
    }
}

/// Saturday ED cover starting the moment a night-float block ends Saturday 08:00.
struct SaturdayEdCoverAfterNightFloat;

impl ScoringRule for SaturdayEdCoverAfterNightFloat {
    fn id(&self) -> RuleId {
        RuleId::SaturdayEdCoverAfterNightFloat
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_night_float(shift) || is_saturday_ed_cover(shift)
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
        let morning = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);
        let shifts = ctx.shifts_of(name);
        for night in shifts.iter().filter(|shift| {
            is_night_float(shift) && shift.end.weekday() == Weekday::Sat && shift.end.time() == morning
        }) {
            for saturday in starting_at(&shifts, night.end)
                .iter()
                .filter(|shift| is_saturday_ed_cover(shift))
            {
                out.push(pair_penalty(
                    self.id(),
                    10,
                    name,
                    night,
                    saturday,
                    format!("Saturday ED cover {} directly after night float {}", saturday.id, night.id),
                ));
            }
        }
    }
}

/// Any Monday shift starting the day a Sunday 24-hour ED cover ends.
struct ShiftAfterSundayEdCover;

impl ScoringRule for ShiftAfterSundayEdCover {
    fn id(&self) -> RuleId {
        RuleId::ShiftAfterSundayEdCover
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_sunday_ed_cover(shift) || starts_on(shift, Weekday::Mon)
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
        for sunday in shifts.iter().filter(|shift| is_sunday_ed_cover(shift)) {
            for monday in starting_on(&shifts, sunday.end.date())
                .iter()
                .filter(|shift| shift.id != sunday.id && starts_on(shift, Weekday::Mon))
            {
                out.push(pair_penalty(
                    self.id(),
                    10,
                    name,
                    sunday,
                    monday,
                    format!("{} starts the day Sunday ED cover {} ends", monday.id, sunday.id),
                ));
            }
        }
    }
}

/// Friday ED cover count above the configured limit for one level.
struct ExcessFridayEdCover;

impl ScoringRule for ExcessFridayEdCover {
    fn id(&self) -> RuleId {
        RuleId::ExcessFridayEdCover
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_ed_cover(shift) && starts_on(shift, Weekday::Fri)
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
        let limit = &ctx.config().friday_ed_cover_limit;
        if ctx.level_of(name) != Some(&limit.level) {
            return;
        }
        let fridays: Vec<&Shift> = ctx
            .shifts_of(name)
            .into_iter()
            .filter(|shift| is_ed_cover(shift) && starts_on(shift, Weekday::Fri))
            .collect();
        let excess = fridays.len() as i64 - i64::from(limit.max_shifts);
        if excess > 0 {
            out.push(
                ScoreComponent::penalty(
                    self.id(),
                    excess,
                    format!(
                        "{name} holds {} Friday ED covers, limit {}",
                        fridays.len(),
                        limit.max_shifts
                    ),
                )
                .with_shifts(fridays.iter().map(|shift| shift.id))
                .with_employee(name),
            );
        }
    }
}
