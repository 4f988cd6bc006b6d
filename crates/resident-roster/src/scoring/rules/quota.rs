use crate::domain::calendar::{is_night_float, is_weekday_ed_cover, is_weekend_ed_cover};
use crate::domain::Shift;

use super::super::config::QuotaClass;
use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::{employee_of, ScoringRule};

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(QuotaRule::minimum(
            RuleId::MinimumWeekendEdCover,
            QuotaClass::WeekendEdCover,
            5,
        )),
        Box::new(QuotaRule::minimum(
            RuleId::MinimumWeekdayEdCover,
            QuotaClass::WeekdayEdCover,
            1,
        )),
        Box::new(QuotaRule::maximum(
            RuleId::MaximumWeekendEdCover,
            QuotaClass::WeekendEdCover,
        )),
        Box::new(QuotaRule::maximum(
            RuleId::MaximumWeekdayEdCover,
            QuotaClass::WeekdayEdCover,
        )),
        Box::new(QuotaRule::minimum(
            RuleId::MinimumNightFloat,
            QuotaClass::NightFloat,
            10,
        )),
        Box::new(QuotaRule::maximum(
            RuleId::MaximumNightFloat,
            QuotaClass::NightFloat,
        )),
    ]
}

pub(crate) fn in_class(class: QuotaClass, shift: &Shift) -> bool {
    match class {
        QuotaClass::WeekdayEdCover => is_weekday_ed_cover(shift),
        QuotaClass::WeekendEdCover => is_weekend_ed_cover(shift),
        QuotaClass::NightFloat => is_night_float(shift),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Minimum,
    Maximum,
}

/// Per-employee count of one shift class checked against one side of the
/// level's window. Every employee is counted, including those with no shifts.
struct QuotaRule {
    rule: RuleId,
    class: QuotaClass,
    bound: Bound,
    multiplier: i64,
}

impl QuotaRule {
    fn minimum(rule: RuleId, class: QuotaClass, multiplier: i64) -> Self {
        Self {
            rule,
            class,
            bound: Bound::Minimum,
            multiplier,
        }
    }

    fn maximum(rule: RuleId, class: QuotaClass) -> Self {
        Self {
            rule,
            class,
            bound: Bound::Maximum,
            multiplier: 1,
        }
    }
}

impl ScoringRule for QuotaRule {
    fn id(&self) -> RuleId {
        self.rule
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        in_class(self.class, shift)
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
        let Some(level) = ctx.level_of(name) else {
            return;
        };
        let bounds = ctx
            .config()
            .quota_bounds(self.class, level, &ctx.snapshot().rotations);
        let counted: Vec<&Shift> = ctx
            .shifts_of(name)
            .into_iter()
            .filter(|shift| in_class(self.class, shift))
            .collect();
        // No shift of the class means no count to compare.
        if counted.is_empty() {
            return;
        }
        let count = counted.len() as i64;

        let (gap, threshold) = match self.bound {
            Bound::Minimum => match bounds.min {
                Some(min) => (i64::from(min) - count, min),
                None => return,
            },
            Bound::Maximum => match bounds.max {
                Some(max) => (count - i64::from(max), max),
                None => return,
            },
        };
        if gap <= 0 {
            return;
        }

        let direction = match self.bound {
            Bound::Minimum => "minimum",
            Bound::Maximum => "maximum",
        };
        out.push(
            ScoreComponent::penalty(
                self.rule,
                gap * self.multiplier,
                format!("{name} ({level}) has {count} against {direction} {threshold}"),
            )
            .with_shifts(counted.iter().map(|shift| shift.id))
            .with_employee(name),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    use crate::domain::{Employee, Location, ResidentLevel, ScheduleSnapshot};
    use crate::scoring::config::ScoringConfig;
    use crate::scoring::index::ScheduleIndex;

    #[test]
    fn shortfall_skips_empty_counts_and_unknown_levels() {
        let sunday = NaiveDate::from_ymd_opt(2024, 7, 7).expect("valid date");
        let night = |id: u64, employee: &str| {
            let start = sunday.and_hms_opt(20, 0, 0).expect("valid time");
            Shift::new(id, start, start + Duration::hours(108), Location::NightShift, "resident")
                .expect("valid window")
                .assigned_to(employee)
        };
        let snapshot = ScheduleSnapshot::new(
            vec![
                Employee::new("R3a P", ResidentLevel::R3),
                Employee::new("R3b Q", ResidentLevel::R3),
                Employee::new("Fellow", ResidentLevel::from("F1")),
            ],
            vec![night(1, "R3a P"), night(2, "Fellow")],
        );
        let config = ScoringConfig::default();
        let index = ScheduleIndex::build(&snapshot);
        let ctx = ScoringContext::new(&snapshot, &index, &config);

        let rule = QuotaRule::minimum(RuleId::MinimumNightFloat, QuotaClass::NightFloat, 10);
        let components = rule.evaluate(&ctx);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].score, -60);
        assert_eq!(components[0].employees, vec!["R3a P".to_string()]);
    }
}
