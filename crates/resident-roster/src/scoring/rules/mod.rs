//! Rule catalog. Every rule is an independent object behind [`ScoringRule`];
//! the engine folds their outputs and never lets one rule see another's.

mod availability;
mod balancing;
mod completeness;
mod pediatrics;
mod quota;
mod rewards;
mod sequencing;
mod workload;

use crate::domain::Shift;

use super::config::ScoringConfig;
use super::explanation::ScoreComponent;
use super::index::{PartitionKey, RuleScope, ScoringContext};
use super::RuleId;

/// A single scoring rule evaluated partition by partition.
///
/// Implementations must only read facts that belong to the partition they are
/// handed (one employee's shifts, one level's employees, one shift, or the whole
/// schedule), so cached partition results stay valid when other partitions change.
pub trait ScoringRule: Send + Sync {
    fn id(&self) -> RuleId;

    fn scope(&self) -> RuleScope;

    fn evaluate_partition(
        &self,
        ctx: &ScoringContext<'_>,
        key: &PartitionKey,
        out: &mut Vec<ScoreComponent>,
    );

    /// Whether reassigning `shift` can change this rule's output at all.
    fn is_affected_by(&self, _ctx: &ScoringContext<'_>, _shift: &Shift) -> bool {
        true
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Vec<ScoreComponent> {
        let mut out = Vec::new();
        for key in ctx.partitions(self.scope()) {
            self.evaluate_partition(ctx, &key, &mut out);
        }
        out
    }
}

/// Registered rules in catalog order.
pub struct RuleCatalog {
    rules: Vec<Box<dyn ScoringRule>>,
}

impl RuleCatalog {
    /// Rules the configuration enables.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            rules: all_rules()
                .into_iter()
                .filter(|rule| config.is_enabled(rule.id()))
                .collect(),
        }
    }

    /// Every known rule, including opt-in ones.
    pub fn complete() -> Self {
        Self { rules: all_rules() }
    }

    pub fn rules(&self) -> &[Box<dyn ScoringRule>] {
        &self.rules
    }

    pub fn get(&self, id: RuleId) -> Option<&dyn ScoringRule> {
        self.rules
            .iter()
            .find(|rule| rule.id() == id)
            .map(|rule| rule.as_ref())
    }

    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn all_rules() -> Vec<Box<dyn ScoringRule>> {
    let mut rules: Vec<Box<dyn ScoringRule>> = Vec::new();
    rules.extend(sequencing::rules());
    rules.extend(availability::rules());
    rules.extend(quota::rules());
    rules.extend(completeness::rules());
    rules.extend(pediatrics::rules());
    rules.extend(balancing::rules());
    rules.extend(rewards::rules());
    rules.extend(workload::rules());
    rules.sort_by_key(|rule| rule.id());
    rules
}

/// Employee name of an employee partition.
fn employee_of(key: &PartitionKey) -> Option<&str> {
    match key {
        PartitionKey::Employee(name) => Some(name.as_str()),
        _ => None,
    }
}
