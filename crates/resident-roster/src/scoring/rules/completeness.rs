use std::collections::BTreeSet;

use crate::domain::calendar::{is_night_float, is_weekday_ed_cover, is_weekend_ed_cover};
use crate::domain::{Location, Shift};

use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::{employee_of, ScoringRule};

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(UnassignedMandatoryShift),
        Box::new(RequiredShiftTypes),
        Box::new(WeekdayAndWeekendEdCover),
    ]
}

/// Mandatory shift left without an assignee. Optional shifts are never penalised.
struct UnassignedMandatoryShift;

impl UnassignedMandatoryShift {
    fn weight(shift: &Shift) -> i64 {
        if is_weekend_ed_cover(shift) {
            2
        } else if is_night_float(shift) {
            5
        } else {
            1
        }
    }
}

impl ScoringRule for UnassignedMandatoryShift {
    fn id(&self) -> RuleId {
        RuleId::UnassignedMandatoryShift
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Shift
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        !shift.optional
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        let PartitionKey::Shift(id) = key else {
            return;
        };
        let Some(shift) = ctx.shift(*id) else {
            return;
        };
        if shift.employee.is_some() || shift.optional {
            return;
        }
        out.push(
            ScoreComponent::penalty(
                self.id(),
                Self::weight(shift),
                format!("{} shift {} has no resident", shift.location, shift.id),
            )
            .with_shifts([shift.id]),
        );
    }
}

/// Each configured location must appear at least once in a resident's schedule.
struct RequiredShiftTypes;

impl ScoringRule for RequiredShiftTypes {
    fn id(&self) -> RuleId {
        RuleId::RequiredShiftTypes
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
        // Any first shift, whatever its location, brings the resident into scope.
        let shifts = ctx.shifts_of(name);
        if shifts.is_empty() {
            return;
        }
        let held: BTreeSet<Location> = shifts.into_iter().map(|shift| shift.location).collect();
        let missing: Vec<&'static str> = ctx
            .config()
            .required_locations
            .iter()
            .filter(|location| !held.contains(*location))
            .map(|location| location.label())
            .collect();
        if missing.is_empty() {
            return;
        }
        out.push(
            ScoreComponent::penalty(
                self.id(),
                100 * missing.len() as i64,
                format!("{name} has no {} shift", missing.join(", ")),
            )
            .with_employee(name),
        );
    }
}

/// A resident needs ED cover on both sides of the week.
struct WeekdayAndWeekendEdCover;

impl ScoringRule for WeekdayAndWeekendEdCover {
    fn id(&self) -> RuleId {
        RuleId::WeekdayAndWeekendEdCover
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
        if shifts.is_empty() {
            return;
        }
        let mut missing = Vec::new();
        if !shifts.iter().any(|shift| is_weekend_ed_cover(shift)) {
            missing.push("weekend");
        }
        if !shifts.iter().any(|shift| is_weekday_ed_cover(shift)) {
            missing.push("weekday");
        }
        if missing.is_empty() {
            return;
        }
        out.push(
            ScoreComponent::penalty(
                self.id(),
                50 * missing.len() as i64,
                format!("{name} has no {} ED cover", missing.join(" or ")),
            )
            .with_employee(name),
        );
    }
}
