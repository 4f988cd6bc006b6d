//! Hard/medium/soft scoring of a resident schedule.
//!
//! [`ScoringEngine`] evaluates every registered rule over a validated snapshot
//! and folds the matches into a [`ScoreExplanation`]. [`IncrementalScorer`]
//! keeps per-partition results so a single reassignment only re-runs the
//! partitions it touches.

pub mod blocks;
mod config;
mod explanation;
mod incremental;
mod index;
mod rule_id;
pub mod rules;
mod score;

#[cfg(test)]
mod tests;

pub use config::{BlockPolicy, FridayLimit, QuotaBounds, QuotaClass, QuotaTable, ScoringConfig};
pub use explanation::{RuleTotal, ScoreComponent, ScoreExplanation};
pub use incremental::IncrementalScorer;
pub use index::{PartitionKey, RuleScope, ScheduleIndex, ScoringContext};
pub use rule_id::{RuleId, UnknownRule};
pub use score::{HardMediumSoftScore, ScoreLevel};

use tracing::debug;

use crate::domain::{ScheduleError, ScheduleSnapshot};
use rules::{RuleCatalog, ScoringRule};

/// Stateless evaluator that applies the configured rule catalog to a snapshot.
pub struct ScoringEngine {
    config: ScoringConfig,
    catalog: RuleCatalog,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        let catalog = RuleCatalog::from_config(&config);
        debug!(rules = catalog.len(), "scoring engine configured");
        Self { config, catalog }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.catalog.ids()
    }

    pub fn score(&self, snapshot: &ScheduleSnapshot) -> Result<HardMediumSoftScore, ScheduleError> {
        self.explain(snapshot).map(|explanation| explanation.score)
    }

    /// Score plus every match, in catalog order.
    pub fn explain(&self, snapshot: &ScheduleSnapshot) -> Result<ScoreExplanation, ScheduleError> {
        snapshot.validate()?;
        let index = ScheduleIndex::build(snapshot);
        let ctx = ScoringContext::new(snapshot, &index, &self.config);
        let explanation = ScoreExplanation::from_components(evaluate_rules(self.catalog.rules(), &ctx));
        debug!(
            score = %explanation.score,
            matches = explanation.components.len(),
            "schedule scored"
        );
        Ok(explanation)
    }

    /// Evaluates one rule in isolation, including opt-in rules the catalog
    /// leaves out.
    pub fn evaluate_rule(
        &self,
        rule: RuleId,
        snapshot: &ScheduleSnapshot,
    ) -> Result<ScoreExplanation, ScheduleError> {
        snapshot.validate()?;
        let index = ScheduleIndex::build(snapshot);
        let ctx = ScoringContext::new(snapshot, &index, &self.config);
        let components = match self.catalog.get(rule) {
            Some(registered) => registered.evaluate(&ctx),
            None => RuleCatalog::complete()
                .get(rule)
                .map(|unregistered| unregistered.evaluate(&ctx))
                .unwrap_or_default(),
        };
        Ok(ScoreExplanation::from_components(components))
    }

    /// Incremental scorer seeded with a full evaluation of `snapshot`.
    pub fn incremental(
        &self,
        snapshot: ScheduleSnapshot,
    ) -> Result<IncrementalScorer<'_>, ScheduleError> {
        snapshot.validate()?;
        Ok(IncrementalScorer::new(
            snapshot,
            &self.config,
            self.catalog.rules(),
        ))
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_rules(rules: &[Box<dyn ScoringRule>], ctx: &ScoringContext<'_>) -> Vec<ScoreComponent> {
    rules.iter().flat_map(|rule| rule.evaluate(ctx)).collect()
}

#[cfg(feature = "parallel")]
fn evaluate_rules(rules: &[Box<dyn ScoringRule>], ctx: &ScoringContext<'_>) -> Vec<ScoreComponent> {
    use rayon::prelude::*;

    let per_rule: Vec<Vec<ScoreComponent>> =
        rules.par_iter().map(|rule| rule.evaluate(ctx)).collect();
    per_rule.into_iter().flatten().collect()
}
