use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Month, NaiveDateTime};

use crate::domain::calendar::{is_peds, spans_date};
use crate::domain::{ResidentLevel, Shift};

use super::super::blocks::overlapping_pairs;
use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::{employee_of, ScoringRule};

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(MaximumPedsShifts),
        Box::new(PedsDuringHolidays),
        Box::new(OverlappingPedsBetweenResidents),
        Box::new(PedsInJune {
            rule: RuleId::PedsForR4InJune,
            level: ResidentLevel::R4,
            weight: 1,
        }),
        Box::new(NamedResidentPedsOverlap),
        Box::new(PedsInJune {
            rule: RuleId::PedsForR3InJune,
            level: ResidentLevel::R3,
            weight: 10,
        }),
        Box::new(PedsConcurrencyLimit),
    ]
}

/// Assigned pediatric shifts sorted by start.
fn assigned_peds<'a>(ctx: &ScoringContext<'a>) -> Vec<&'a Shift> {
    let mut shifts: Vec<&'a Shift> = ctx.assigned_shifts().filter(|shift| is_peds(shift)).collect();
    shifts.sort_by_key(|shift| (shift.start, shift.id));
    shifts
}

fn assignee(shift: &Shift) -> &str {
    shift.employee.as_deref().unwrap_or_default()
}

struct MaximumPedsShifts;

impl ScoringRule for MaximumPedsShifts {
    fn id(&self) -> RuleId {
        RuleId::MaximumPedsShifts
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_peds(shift)
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
        let peds: Vec<&Shift> = ctx
            .shifts_of(name)
            .into_iter()
            .filter(|shift| is_peds(shift))
            .collect();
        if peds.len() > 1 {
            out.push(
                ScoreComponent::penalty(
                    self.id(),
                    10 * (peds.len() as i64 - 1),
                    format!("{name} holds {} pediatric blocks", peds.len()),
                )
                .with_shifts(peds.iter().map(|shift| shift.id))
                .with_employee(name),
            );
        }
    }
}

/// Pediatric block whose day span includes configured holidays.
struct PedsDuringHolidays;

impl ScoringRule for PedsDuringHolidays {
    fn id(&self) -> RuleId {
        RuleId::PedsDuringHolidays
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Shift
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_peds(shift)
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
        let Some(name) = shift.employee.as_deref() else {
            return;
        };
        if !is_peds(shift) {
            return;
        }
        let holidays: Vec<String> = ctx
            .config()
            .holidays
            .iter()
            .filter(|holiday| spans_date(shift, **holiday))
            .map(|holiday| holiday.to_string())
            .collect();
        if holidays.is_empty() {
            return;
        }
        out.push(
            ScoreComponent::penalty(
                self.id(),
                50 * holidays.len() as i64,
                format!("pediatric block {} covers {}", shift.id, holidays.join(", ")),
            )
            .with_shifts([shift.id])
            .with_employee(name),
        );
    }
}

/// Pediatric blocks starting in June for one resident level.
struct PedsInJune {
    rule: RuleId,
    level: ResidentLevel,
    weight: i64,
}

impl ScoringRule for PedsInJune {
    fn id(&self) -> RuleId {
        self.rule
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Shift
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_peds(shift)
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
        let Some(name) = shift.employee.as_deref() else {
            return;
        };
        let in_june = shift.start.month() == Month::June.number_from_month();
        if is_peds(shift) && in_june && ctx.level_of(name) == Some(&self.level) {
            out.push(
                ScoreComponent::penalty(
                    self.rule,
                    self.weight,
                    format!("{name} ({}) on pediatric block {} in June", self.level, shift.id),
                )
                .with_shifts([shift.id])
                .with_employee(name),
            );
        }
    }
}

/// Overlapping pediatric blocks held by two different residents.
struct OverlappingPedsBetweenResidents;

impl ScoringRule for OverlappingPedsBetweenResidents {
    fn id(&self) -> RuleId {
        RuleId::OverlappingPedsBetweenResidents
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Schedule
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_peds(shift)
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        if key != &PartitionKey::Schedule {
            return;
        }
        let peds = assigned_peds(ctx);
        for (first, second) in overlapping_pairs(&peds) {
            let (a, b) = (assignee(first), assignee(second));
            if a == b || ctx.config().peds_overlap_allowed(a, b) {
                continue;
            }
            out.push(
                ScoreComponent::penalty(
                    self.id(),
                    1,
                    format!("pediatric blocks {} ({a}) and {} ({b}) overlap", first.id, second.id),
                )
                .with_shifts([first.id, second.id])
                .with_employees([a, b]),
            );
        }
    }
}

/// Any overlap touching the configured resident's pediatric block.
struct NamedResidentPedsOverlap;

impl ScoringRule for NamedResidentPedsOverlap {
    fn id(&self) -> RuleId {
        RuleId::NamedResidentPedsOverlap
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Schedule
    }

    fn is_affected_by(&self, ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_peds(shift) && ctx.config().named_peds_resident.is_some()
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        if key != &PartitionKey::Schedule {
            return;
        }
        let Some(named) = ctx.config().named_peds_resident.as_deref() else {
            return;
        };
        let peds = assigned_peds(ctx);
        for (first, second) in overlapping_pairs(&peds) {
            let (a, b) = (assignee(first), assignee(second));
            if a != named && b != named {
                continue;
            }
            out.push(
                ScoreComponent::penalty(
                    self.id(),
                    1,
                    format!("pediatric block of {named} overlaps {} / {}", first.id, second.id),
                )
                .with_shifts([first.id, second.id])
                .with_employees([a, b]),
            );
        }
    }
}

/// At most two distinct residents on pediatric blocks with the same window.
struct PedsConcurrencyLimit;

impl ScoringRule for PedsConcurrencyLimit {
    fn id(&self) -> RuleId {
        RuleId::PedsConcurrencyLimit
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Schedule
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_peds(shift)
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        if key != &PartitionKey::Schedule {
            return;
        }
        let mut windows: BTreeMap<(NaiveDateTime, NaiveDateTime), (Vec<&Shift>, BTreeSet<&str>)> =
            BTreeMap::new();
        for shift in assigned_peds(ctx) {
            let entry = windows.entry((shift.start, shift.end)).or_default();
            entry.0.push(shift);
            entry.1.insert(assignee(shift));
        }
        for ((start, end), (shifts, residents)) in windows {
            if residents.len() <= 2 {
                continue;
            }
            out.push(
                ScoreComponent::penalty(
                    self.id(),
                    10 * (residents.len() as i64 - 2),
                    format!("{} residents share the pediatric window {start} - {end}", residents.len()),
                )
                .with_shifts(shifts.iter().map(|shift| shift.id))
                .with_employees(residents),
            );
        }
    }
}
