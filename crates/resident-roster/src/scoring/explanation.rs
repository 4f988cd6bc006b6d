use serde::{Deserialize, Serialize};

use super::{HardMediumSoftScore, RuleId, ScoreLevel};
use crate::domain::ShiftId;

/// One match of one rule, naming the facts that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub rule: RuleId,
    pub level: ScoreLevel,
    /// Signed impact on `level`; negative for penalties.
    pub score: i64,
    pub shift_ids: Vec<ShiftId>,
    pub employees: Vec<String>,
    pub notes: String,
}

impl ScoreComponent {
    pub fn penalty(rule: RuleId, weight: i64, notes: impl Into<String>) -> Self {
        Self {
            rule,
            level: rule.level(),
            score: -weight,
            shift_ids: Vec::new(),
            employees: Vec::new(),
            notes: notes.into(),
        }
    }

    pub fn reward(rule: RuleId, weight: i64, notes: impl Into<String>) -> Self {
        Self {
            score: weight,
            ..Self::penalty(rule, 0, notes)
        }
    }

    pub fn with_shifts(mut self, shifts: impl IntoIterator<Item = ShiftId>) -> Self {
        self.shift_ids.extend(shifts);
        self
    }

    pub fn with_employee(mut self, employee: impl Into<String>) -> Self {
        let employee = employee.into();
        if !self.employees.contains(&employee) {
            self.employees.push(employee);
        }
        self
    }

    pub fn with_employees<S: Into<String>>(self, employees: impl IntoIterator<Item = S>) -> Self {
        employees
            .into_iter()
            .fold(self, |component, employee| component.with_employee(employee))
    }

    pub fn as_score(&self) -> HardMediumSoftScore {
        HardMediumSoftScore::of_level(self.level, self.score)
    }
}

/// Score triple plus the ordered justification list that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreExplanation {
    pub score: HardMediumSoftScore,
    pub components: Vec<ScoreComponent>,
}

/// Aggregate of one rule's matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTotal {
    pub rule: RuleId,
    pub label: &'static str,
    pub level: ScoreLevel,
    pub score: HardMediumSoftScore,
    pub matches: usize,
}

impl ScoreExplanation {
    pub fn from_components(components: Vec<ScoreComponent>) -> Self {
        let score = components.iter().map(ScoreComponent::as_score).sum();
        Self { score, components }
    }

    pub fn for_rule(&self, rule: RuleId) -> impl Iterator<Item = &ScoreComponent> {
        self.components
            .iter()
            .filter(move |component| component.rule == rule)
    }

    pub fn rule_score(&self, rule: RuleId) -> HardMediumSoftScore {
        self.for_rule(rule).map(ScoreComponent::as_score).sum()
    }

    /// Per-rule totals in catalog order, skipping rules without matches.
    pub fn summary(&self) -> Vec<RuleTotal> {
        RuleId::ordered()
            .into_iter()
            .filter_map(|rule| {
                let matches = self.for_rule(rule).count();
                (matches > 0).then(|| RuleTotal {
                    rule,
                    label: rule.label(),
                    level: rule.level(),
                    score: self.rule_score(rule),
                    matches,
                })
            })
            .collect()
    }

    /// Matches that mention the given employee.
    pub fn for_employee<'a>(&'a self, employee: &'a str) -> impl Iterator<Item = &'a ScoreComponent> {
        self.components
            .iter()
            .filter(move |component| component.employees.iter().any(|name| name == employee))
    }
}
