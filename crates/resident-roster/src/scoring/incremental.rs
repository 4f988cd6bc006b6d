use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::domain::{ScheduleError, ScheduleSnapshot, ShiftId};

use super::config::ScoringConfig;
use super::explanation::{ScoreComponent, ScoreExplanation};
use super::index::{PartitionKey, RuleScope, ScheduleIndex, ScoringContext};
use super::rules::ScoringRule;
use super::score::HardMediumSoftScore;

#[derive(Debug, Clone)]
struct PartitionResult {
    score: HardMediumSoftScore,
    components: Vec<ScoreComponent>,
}

impl PartitionResult {
    fn new(components: Vec<ScoreComponent>) -> Self {
        Self {
            score: components.iter().map(ScoreComponent::as_score).sum(),
            components,
        }
    }
}

/// Owns a working copy of the snapshot and the cached output of every rule per
/// partition. Reassigning one shift re-runs only the partitions it touches:
/// the old and new assignee, their levels, the shift itself and the schedule
/// as a whole, and only for rules the shift can affect.
pub struct IncrementalScorer<'e> {
    snapshot: ScheduleSnapshot,
    index: ScheduleIndex,
    config: &'e ScoringConfig,
    rules: &'e [Box<dyn ScoringRule>],
    cache: Vec<BTreeMap<PartitionKey, PartitionResult>>,
    score: HardMediumSoftScore,
}

impl<'e> IncrementalScorer<'e> {
    pub(crate) fn new(
        snapshot: ScheduleSnapshot,
        config: &'e ScoringConfig,
        rules: &'e [Box<dyn ScoringRule>],
    ) -> Self {
        let index = ScheduleIndex::build(&snapshot);
        let ctx = ScoringContext::new(&snapshot, &index, config);
        let mut score = HardMediumSoftScore::ZERO;
        let mut cache = Vec::with_capacity(rules.len());
        for rule in rules {
            let mut partitions = BTreeMap::new();
            for key in ctx.partitions(rule.scope()) {
                let mut out = Vec::new();
                rule.evaluate_partition(&ctx, &key, &mut out);
                if !out.is_empty() {
                    let result = PartitionResult::new(out);
                    score += result.score;
                    partitions.insert(key, result);
                }
            }
            cache.push(partitions);
        }

        Self {
            snapshot,
            index,
            config,
            rules,
            cache,
            score,
        }
    }

    pub fn score(&self) -> HardMediumSoftScore {
        self.score
    }

    pub fn snapshot(&self) -> &ScheduleSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> ScheduleSnapshot {
        self.snapshot
    }

    /// Same list a full evaluation of the current assignment produces.
    pub fn explain(&self) -> ScoreExplanation {
        let components = self
            .cache
            .iter()
            .flat_map(|partitions| partitions.values())
            .flat_map(|result| result.components.iter().cloned())
            .collect();
        ScoreExplanation {
            score: self.score,
            components,
        }
    }

    /// Moves `shift` to `employee` (or unassigns it) and returns the new score.
    pub fn assign(
        &mut self,
        shift: ShiftId,
        employee: Option<&str>,
    ) -> Result<HardMediumSoftScore, ScheduleError> {
        let position = self
            .index
            .shift_position(shift)
            .ok_or(ScheduleError::UnknownShift(shift))?;
        if let Some(name) = employee {
            if !self.index.contains_employee(name) {
                return Err(ScheduleError::UnknownEmployee(name.to_string()));
            }
        }
        let previous = self.snapshot.shifts[position].employee.clone();
        if previous.as_deref() == employee {
            return Ok(self.score);
        }

        let Self {
            snapshot,
            index,
            config,
            rules,
            cache,
            score,
        } = self;
        snapshot.shifts[position].employee = employee.map(str::to_string);
        index.reassign(snapshot, position, previous.as_deref(), employee);

        let ctx = ScoringContext::new(snapshot, index, *config);
        let moved = &snapshot.shifts[position];
        let touched: Vec<&str> = previous.as_deref().into_iter().chain(employee).collect();
        let mut recomputed = 0_usize;

        for (rule, partitions) in rules.iter().zip(cache.iter_mut()) {
            if !rule.is_affected_by(&ctx, moved) {
                continue;
            }
            for key in dirty_partitions(&ctx, rule.scope(), shift, &touched) {
                let mut out = Vec::new();
                rule.evaluate_partition(&ctx, &key, &mut out);
                recomputed += 1;
                let stale = if out.is_empty() {
                    partitions.remove(&key)
                } else {
                    let fresh = PartitionResult::new(out);
                    *score += fresh.score;
                    partitions.insert(key, fresh)
                };
                if let Some(stale) = stale {
                    *score -= stale.score;
                }
            }
        }

        trace!(
            shift = %shift,
            from = previous.as_deref().unwrap_or("-"),
            to = employee.unwrap_or("-"),
            recomputed,
            score = %score,
            "shift reassigned"
        );
        Ok(*score)
    }
}

fn dirty_partitions(
    ctx: &ScoringContext<'_>,
    scope: RuleScope,
    shift: ShiftId,
    touched: &[&str],
) -> BTreeSet<PartitionKey> {
    match scope {
        RuleScope::Schedule => BTreeSet::from([PartitionKey::Schedule]),
        RuleScope::Shift => BTreeSet::from([PartitionKey::Shift(shift)]),
        RuleScope::Employee => touched
            .iter()
            .map(|name| PartitionKey::Employee(name.to_string()))
            .collect(),
        RuleScope::Level => ctx.level_partitions_for(touched.iter().copied()),
    }
}
