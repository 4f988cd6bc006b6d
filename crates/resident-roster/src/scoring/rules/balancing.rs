use chrono::Weekday;

use crate::domain::calendar::{is_ed_cover, is_night_float, is_weekend, starts_at, starts_on};
use crate::domain::Shift;

use super::super::config::ScoringConfig;
use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::ScoringRule;

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(BalanceRule {
            rule: RuleId::FridayEdCoverBalance,
            filter: friday_ed_cover,
            shape: PenaltyShape::Linear,
            threshold: 1,
            weight: 1,
        }),
        Box::new(BalanceRule {
            rule: RuleId::WeekendShiftBalance,
            filter: weekend_shift,
            shape: PenaltyShape::Quadratic,
            threshold: 1,
            weight: 1,
        }),
        Box::new(BalanceRule {
            rule: RuleId::EveningShiftBalance,
            filter: evening_shift,
            shape: PenaltyShape::Linear,
            threshold: 5,
            weight: 1,
        }),
        Box::new(BalanceRule {
            rule: RuleId::NightFloatBalance,
            filter: night_shift,
            shape: PenaltyShape::Linear,
            threshold: 1,
            weight: 2,
        }),
        Box::new(SaturdaySundayBalance { threshold: 2 }),
    ]
}

fn friday_ed_cover(shift: &Shift, _config: &ScoringConfig) -> bool {
    is_ed_cover(shift) && starts_on(shift, Weekday::Fri)
}

fn weekend_shift(shift: &Shift, _config: &ScoringConfig) -> bool {
    is_weekend(shift)
}

fn evening_shift(shift: &Shift, config: &ScoringConfig) -> bool {
    starts_at(shift, config.evening_start)
}

fn night_shift(shift: &Shift, _config: &ScoringConfig) -> bool {
    is_night_float(shift)
}

/// How a pairwise count difference above the threshold turns into a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PenaltyShape {
    Linear,
    Quadratic,
}

impl PenaltyShape {
    pub(crate) fn apply(self, difference: i64, threshold: i64) -> i64 {
        let excess = difference - threshold;
        if excess <= 0 {
            return 0;
        }
        match self {
            PenaltyShape::Linear => excess,
            PenaltyShape::Quadratic => excess * excess,
        }
    }
}

/// Sum of shaped differences over every pair of distinct counts.
pub(crate) fn pairwise_penalty(counts: &[i64], shape: PenaltyShape, threshold: i64) -> i64 {
    let mut total = 0;
    for (i, a) in counts.iter().enumerate() {
        for b in &counts[i + 1..] {
            total += shape.apply((a - b).abs(), threshold);
        }
    }
    total
}

/// Per-level fairness of one shift class. Only residents holding at least one
/// matching shift take part.
struct BalanceRule {
    rule: RuleId,
    filter: fn(&Shift, &ScoringConfig) -> bool,
    shape: PenaltyShape,
    threshold: i64,
    weight: i64,
}

impl ScoringRule for BalanceRule {
    fn id(&self) -> RuleId {
        self.rule
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Level
    }

    fn is_affected_by(&self, ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        (self.filter)(shift, ctx.config())
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        let PartitionKey::Level(level) = key else {
            return;
        };
        let config = ctx.config();
        let mut names = Vec::new();
        let mut counts = Vec::new();
        for name in ctx.employees_at(level) {
            let count = ctx
                .shifts_of(name)
                .into_iter()
                .filter(|shift| (self.filter)(*shift, config))
                .count() as i64;
            if count > 0 {
                names.push(name.as_str());
                counts.push(count);
            }
        }

        let penalty = self.weight * pairwise_penalty(&counts, self.shape, self.threshold);
        if penalty == 0 {
            return;
        }
        let spread = names
            .iter()
            .zip(&counts)
            .map(|(name, count)| format!("{name}={count}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(
            ScoreComponent::penalty(self.rule, penalty, format!("{level} counts: {spread}"))
                .with_employees(names),
        );
    }
}

/// Saturday against Sunday starts across a whole level.
struct SaturdaySundayBalance {
    threshold: i64,
}

impl ScoringRule for SaturdaySundayBalance {
    fn id(&self) -> RuleId {
        RuleId::SaturdaySundayBalance
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Level
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_weekend(shift)
    }

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    ) {
        let PartitionKey::Level(level) = key else {
            return;
        };
        let (mut saturdays, mut sundays) = (0_i64, 0_i64);
        for name in ctx.employees_at(level) {
            for shift in ctx.shifts_of(name) {
                if starts_on(shift, Weekday::Sat) {
                    saturdays += 1;
                } else if starts_on(shift, Weekday::Sun) {
                    sundays += 1;
                }
            }
        }
        let penalty = PenaltyShape::Quadratic.apply((saturdays - sundays).abs(), self.threshold);
        if penalty > 0 {
            out.push(ScoreComponent::penalty(
                self.id(),
                penalty,
                format!("{level} works {saturdays} Saturdays and {sundays} Sundays"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_counts_are_free() {
        assert_eq!(pairwise_penalty(&[5, 5, 5], PenaltyShape::Quadratic, 1), 0);
        assert_eq!(pairwise_penalty(&[5, 5, 5], PenaltyShape::Linear, 1), 0);
    }

    #[test]
    fn outlier_counts_once_per_pair() {
        assert_eq!(pairwise_penalty(&[5, 5, 9], PenaltyShape::Quadratic, 1), 18);
        assert_eq!(pairwise_penalty(&[5, 5, 9], PenaltyShape::Linear, 1), 6);
    }

    #[test]
    fn difference_at_threshold_is_tolerated() {
        assert_eq!(PenaltyShape::Quadratic.apply(2, 2), 0);
        assert_eq!(PenaltyShape::Quadratic.apply(5, 2), 9);
        assert_eq!(PenaltyShape::Linear.apply(8, 5), 3);
    }
}
