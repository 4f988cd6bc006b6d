use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{Availability, Employee, ResidentLevel, ScheduleSnapshot, Shift, ShiftId};

use super::config::ScoringConfig;

/// Partition of the fact set a rule evaluates independently. Cached contributions
/// are keyed by these, so a single reassignment only invalidates a few of them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartitionKey {
    Schedule,
    Level(ResidentLevel),
    Employee(String),
    Shift(ShiftId),
}

/// How a rule partitions its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Schedule,
    Level,
    Employee,
    Shift,
}

/// Positional lookups into a snapshot. Assigned shift lists stay sorted by
/// `(start, id)` so pair rules can sweep instead of cross-joining.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    employees: BTreeMap<String, usize>,
    shift_positions: HashMap<ShiftId, usize>,
    shift_ids: Vec<ShiftId>,
    assigned: BTreeMap<String, Vec<usize>>,
    availability: BTreeMap<String, Vec<usize>>,
    levels: BTreeMap<ResidentLevel, Vec<String>>,
}

impl ScheduleIndex {
    pub fn build(snapshot: &ScheduleSnapshot) -> Self {
        let mut index = Self::default();

        for (position, employee) in snapshot.employees.iter().enumerate() {
            index.employees.insert(employee.name.clone(), position);
            index.assigned.entry(employee.name.clone()).or_default();
            index
                .levels
                .entry(employee.level.clone())
                .or_default()
                .push(employee.name.clone());
        }
        for names in index.levels.values_mut() {
            names.sort();
        }

        for (position, shift) in snapshot.shifts.iter().enumerate() {
            index.shift_positions.insert(shift.id, position);
            if let Some(list) = shift
                .employee
                .as_ref()
                .and_then(|name| index.assigned.get_mut(name))
            {
                list.push(position);
            }
        }
        for list in index.assigned.values_mut() {
            list.sort_by_key(|&position| sort_key(&snapshot.shifts[position]));
        }
        index.shift_ids = snapshot.shifts.iter().map(|shift| shift.id).collect();
        index.shift_ids.sort();

        for (position, availability) in snapshot.availabilities.iter().enumerate() {
            index
                .availability
                .entry(availability.employee.clone())
                .or_default()
                .push(position);
        }

        index
    }

    pub fn shift_position(&self, id: ShiftId) -> Option<usize> {
        self.shift_positions.get(&id).copied()
    }

    pub fn contains_employee(&self, name: &str) -> bool {
        self.employees.contains_key(name)
    }

    /// Moves the shift at `position` from one assignee list to another. The
    /// snapshot must already carry the new assignment.
    pub fn reassign(
        &mut self,
        snapshot: &ScheduleSnapshot,
        position: usize,
        from: Option<&str>,
        to: Option<&str>,
    ) {
        if let Some(list) = from.and_then(|name| self.assigned.get_mut(name)) {
            list.retain(|&existing| existing != position);
        }
        if let Some(list) = to.and_then(|name| self.assigned.get_mut(name)) {
            let key = sort_key(&snapshot.shifts[position]);
            let at = list.partition_point(|&existing| sort_key(&snapshot.shifts[existing]) < key);
            list.insert(at, position);
        }
    }

    pub fn partitions(&self, scope: RuleScope) -> Vec<PartitionKey> {
        match scope {
            RuleScope::Schedule => vec![PartitionKey::Schedule],
            RuleScope::Level => self.levels.keys().cloned().map(PartitionKey::Level).collect(),
            RuleScope::Employee => self
                .employees
                .keys()
                .cloned()
                .map(PartitionKey::Employee)
                .collect(),
            RuleScope::Shift => self.shift_ids.iter().copied().map(PartitionKey::Shift).collect(),
        }
    }
}

fn sort_key(shift: &Shift) -> (chrono::NaiveDateTime, ShiftId) {
    (shift.start, shift.id)
}

/// Read-only view handed to rules: facts, lookups and configuration.
#[derive(Clone, Copy)]
pub struct ScoringContext<'a> {
    snapshot: &'a ScheduleSnapshot,
    index: &'a ScheduleIndex,
    config: &'a ScoringConfig,
}

impl<'a> ScoringContext<'a> {
    pub fn new(
        snapshot: &'a ScheduleSnapshot,
        index: &'a ScheduleIndex,
        config: &'a ScoringConfig,
    ) -> Self {
        Self {
            snapshot,
            index,
            config,
        }
    }

    pub fn snapshot(&self) -> &'a ScheduleSnapshot {
        self.snapshot
    }

    pub fn config(&self) -> &'a ScoringConfig {
        self.config
    }

    pub fn employee(&self, name: &str) -> Option<&'a Employee> {
        self.index
            .employees
            .get(name)
            .map(|&position| &self.snapshot.employees[position])
    }

    pub fn level_of(&self, name: &str) -> Option<&'a ResidentLevel> {
        self.employee(name).map(|employee| &employee.level)
    }

    pub fn shift(&self, id: ShiftId) -> Option<&'a Shift> {
        self.index
            .shift_position(id)
            .map(|position| &self.snapshot.shifts[position])
    }

    /// Every shift with an assignee, in snapshot order.
    pub fn assigned_shifts(&self) -> impl Iterator<Item = &'a Shift> + 'a {
        self.snapshot
            .shifts
            .iter()
            .filter(|shift| shift.employee.is_some())
    }

    /// An employee's shifts sorted by start.
    pub fn shifts_of(&self, name: &str) -> Vec<&'a Shift> {
        let snapshot = self.snapshot;
        self.index
            .assigned
            .get(name)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &snapshot.shifts[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn availabilities_of(&self, name: &str) -> Vec<&'a Availability> {
        let snapshot = self.snapshot;
        self.index
            .availability
            .get(name)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &snapshot.availabilities[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn employees_at(&self, level: &ResidentLevel) -> &'a [String] {
        self.index
            .levels
            .get(level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn partitions(&self, scope: RuleScope) -> Vec<PartitionKey> {
        self.index.partitions(scope)
    }

    pub fn level_partitions_for<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> BTreeSet<PartitionKey> {
        names
            .into_iter()
            .filter_map(|name| self.level_of(name))
            .cloned()
            .map(PartitionKey::Level)
            .collect()
    }
}
