use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Availability, Employee, Rotation, ScheduleError, Shift, ShiftId};

/// Everything one scoring call reads. Only `Shift::employee` changes between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub availabilities: Vec<Availability>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub rotations: Vec<Rotation>,
}

impl ScheduleSnapshot {
    pub fn new(employees: Vec<Employee>, shifts: Vec<Shift>) -> Self {
        Self {
            employees,
            shifts,
            ..Self::default()
        }
    }

    pub fn with_availabilities(mut self, availabilities: Vec<Availability>) -> Self {
        self.availabilities = availabilities;
        self
    }

    pub fn with_rotations(mut self, rotations: Vec<Rotation>) -> Self {
        self.rotations = rotations;
        self
    }

    pub fn employee(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.name == name)
    }

    pub fn shift(&self, id: ShiftId) -> Option<&Shift> {
        self.shifts.iter().find(|shift| shift.id == id)
    }

    /// Rejects facts that would otherwise be silently mis-scored.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let mut names = HashSet::with_capacity(self.employees.len());
        for employee in &self.employees {
            if !names.insert(employee.name.as_str()) {
                return Err(ScheduleError::DuplicateEmployee(employee.name.clone()));
            }
        }

        let mut ids = HashSet::with_capacity(self.shifts.len());
        for shift in &self.shifts {
            if !ids.insert(shift.id) {
                return Err(ScheduleError::DuplicateShift(shift.id));
            }
            shift.check_window()?;
            if let Some(employee) = &shift.employee {
                if !names.contains(employee.as_str()) {
                    return Err(ScheduleError::UnknownAssignee {
                        shift: shift.id,
                        employee: employee.clone(),
                    });
                }
            }
        }

        for availability in &self.availabilities {
            if !names.contains(availability.employee.as_str()) {
                return Err(ScheduleError::UnknownAvailabilityEmployee {
                    employee: availability.employee.clone(),
                    date: availability.date,
                });
            }
        }

        debug!(
            employees = self.employees.len(),
            shifts = self.shifts.len(),
            availabilities = self.availabilities.len(),
            "schedule snapshot validated"
        );
        Ok(())
    }
}
