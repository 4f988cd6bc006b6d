use crate::domain::calendar::{is_peds, is_weekend_ed_cover, spans_date};
use crate::domain::{Availability, AvailabilityType, Shift};

use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::{employee_of, ScoringRule};

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(UnavailableEmployee),
        Box::new(UnavailableEmployeeForPediatrics),
        Box::new(PreferredDay {
            rule: RuleId::DesiredDay,
            kind: AvailabilityType::Desired,
        }),
        Box::new(PreferredDay {
            rule: RuleId::UndesiredDay,
            kind: AvailabilityType::Undesired,
        }),
        Box::new(WeekendShiftNearUnavailability),
    ]
}

/// Every (shift, availability) pair of one employee with the given type.
fn matching_pairs<'a>(
    ctx: &ScoringContext<'a>,
    name: &str,
    kind: AvailabilityType,
) -> Vec<(&'a Shift, &'a Availability)> {
    let availabilities: Vec<&Availability> = ctx
        .availabilities_of(name)
        .into_iter()
        .filter(|availability| availability.kind == kind)
        .collect();
    if availabilities.is_empty() {
        return Vec::new();
    }
    ctx.shifts_of(name)
        .into_iter()
        .flat_map(|shift| {
            availabilities
                .iter()
                .map(move |availability| (shift, *availability))
        })
        .collect()
}

fn unavailable_component(
    rule: RuleId,
    weight: i64,
    shift: &Shift,
    availability: &Availability,
) -> ScoreComponent {
    ScoreComponent::penalty(
        rule,
        weight,
        format!(
            "{} spans {} which {} marked unavailable",
            shift.id, availability.date, availability.employee
        ),
    )
    .with_shifts([shift.id])
    .with_employee(availability.employee.as_str())
}

/// Non-pediatric shift whose day span covers an unavailable date.
struct UnavailableEmployee;

impl ScoringRule for UnavailableEmployee {
    fn id(&self) -> RuleId {
        RuleId::UnavailableEmployee
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        !is_peds(shift)
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
        for (shift, availability) in matching_pairs(ctx, name, AvailabilityType::Unavailable) {
            if !is_peds(shift) && spans_date(shift, availability.date) {
                out.push(unavailable_component(self.id(), 100, shift, availability));
            }
        }
    }
}

/// Pediatric away blocks are long; the penalty grows with the days lost.
struct UnavailableEmployeeForPediatrics;

impl UnavailableEmployeeForPediatrics {
    fn overlap_days(shift: &Shift, availability: &Availability) -> i64 {
        if shift.start.date() < availability.date {
            (shift.end.date() - availability.date).num_days() + 1
        } else {
            1
        }
    }
}

impl ScoringRule for UnavailableEmployeeForPediatrics {
    fn id(&self) -> RuleId {
        RuleId::UnavailableEmployeeForPediatrics
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
        for (shift, availability) in matching_pairs(ctx, name, AvailabilityType::Unavailable) {
            if is_peds(shift) && spans_date(shift, availability.date) {
                let days = Self::overlap_days(shift, availability);
                out.push(unavailable_component(self.id(), 100 * days, shift, availability));
            }
        }
    }
}

/// Desired or undesired preference on the shift's start date, weighted by the
/// shift length in minutes.
struct PreferredDay {
    rule: RuleId,
    kind: AvailabilityType,
}

impl ScoringRule for PreferredDay {
    fn id(&self) -> RuleId {
        self.rule
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
        for (shift, availability) in matching_pairs(ctx, name, self.kind) {
            if shift.start.date() != availability.date {
                continue;
            }
            let minutes = shift.duration_minutes();
            let component = match self.kind {
                AvailabilityType::Desired => ScoreComponent::reward(
                    self.rule,
                    minutes,
                    format!("{name} asked for {}", availability.date),
                ),
                _ => ScoreComponent::penalty(
                    self.rule,
                    minutes,
                    format!("{name} asked to avoid {}", availability.date),
                ),
            };
            out.push(component.with_shifts([shift.id]).with_employee(name));
        }
    }
}

/// Weekend 24-hour ED cover starting within one day of an unavailable date.
struct WeekendShiftNearUnavailability;

impl ScoringRule for WeekendShiftNearUnavailability {
    fn id(&self) -> RuleId {
        RuleId::WeekendShiftNearUnavailability
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
        for (shift, availability) in matching_pairs(ctx, name, AvailabilityType::Unavailable) {
            if !is_weekend_ed_cover(shift) {
                continue;
            }
            if (shift.start.date() - availability.date).num_days().abs() <= 1 {
                out.push(
                    ScoreComponent::penalty(
                        self.id(),
                        1,
                        format!(
                            "weekend ED cover {} within a day of unavailable {}",
                            shift.id, availability.date
                        ),
                    )
                    .with_shifts([shift.id])
                    .with_employee(name),
                );
            }
        }
    }
}
