use crate::domain::calendar::is_night_float;
use crate::domain::Shift;

use super::super::blocks::{block_reward, night_float_reward};
use super::super::explanation::ScoreComponent;
use super::super::index::{PartitionKey, RuleScope, ScoringContext};
use super::super::RuleId;
use super::{employee_of, ScoringRule};

pub(super) fn rules() -> Vec<Box<dyn ScoringRule>> {
    vec![Box::new(NightFloatBlockReward)]
}

/// Consecutive night-float weeks grouped into blocks; each eligible block earns
/// one point per week past the first.
struct NightFloatBlockReward;

impl ScoringRule for NightFloatBlockReward {
    fn id(&self) -> RuleId {
        RuleId::NightFloatBlockReward
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Employee
    }

    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, shift: &Shift) -> bool {
        is_night_float(shift)
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
        let policy = &ctx.config().night_float_blocks;
        let nights: Vec<&Shift> = ctx
            .shifts_of(name)
            .into_iter()
            .filter(|shift| is_night_float(shift))
            .collect();
        let (_, blocks) = night_float_reward(nights, policy);
        for block in blocks {
            let points = block_reward(block.len(), policy.reward_cap);
            let (Some(start), Some(end)) = (block.start(), block.end()) else {
                continue;
            };
            out.push(
                ScoreComponent::reward(
                    self.id(),
                    points,
                    format!("{name} night float block of {} from {start} to {end}", block.len()),
                )
                .with_shifts(block.shifts().iter().map(|shift| shift.id))
                .with_employee(name),
            );
        }
    }
}
