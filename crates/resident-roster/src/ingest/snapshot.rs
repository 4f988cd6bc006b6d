use std::io::Read;
use std::path::Path;

use tracing::info;

use super::ImportError;
use crate::domain::ScheduleSnapshot;

/// Reads a full snapshot (employees, availabilities, shifts, rotations) from JSON.
pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ScheduleSnapshot, ImportError> {
        let file = std::fs::File::open(path.as_ref())?;
        let snapshot = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            employees = snapshot.employees.len(),
            shifts = snapshot.shifts.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Parses and validates; a snapshot that would be mis-scored is an error here.
    pub fn from_reader<R: Read>(reader: R) -> Result<ScheduleSnapshot, ImportError> {
        let snapshot: ScheduleSnapshot = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, ResidentLevel, ScheduleError, ShiftId};

    const SNAPSHOT: &str = r#"{
        "employees": [
            {"name": "R2a A", "skills": ["RESIDENT"], "level": "R2"},
            {"name": "Chief", "level": "R5"}
        ],
        "availabilities": [
            {"employee": "R2a A", "date": "2024-07-04", "type": "UNAVAILABLE"}
        ],
        "shifts": [
            {"id": 1, "start": "2024-07-06T08:00:00", "end": "2024-07-07T08:00:00",
             "location": "ED cover", "required_skill": "RESIDENT", "employee": "R2a A"},
            {"id": 2, "start": "2024-07-07T20:00:00", "end": "2024-07-12T08:00:00",
             "location": "Night Shift", "required_skill": "RESIDENT", "optional": true}
        ],
        "rotations": [
            {"level": "R2", "required_blocks": {"Night Shift": 8}}
        ]
    }"#;

    #[test]
    fn reads_snapshot_json() {
        let snapshot = SnapshotImporter::from_reader(SNAPSHOT.as_bytes()).expect("snapshot parses");
        assert_eq!(snapshot.employees.len(), 2);
        assert_eq!(snapshot.employees[1].level, ResidentLevel::Other("R5".to_string()));
        assert!(snapshot.employees[1].skills.is_empty());

        let night = snapshot.shift(ShiftId(2)).expect("night shift present");
        assert_eq!(night.location, Location::NightShift);
        assert!(night.optional);
        assert!(night.employee.is_none());
        assert_eq!(
            snapshot.rotations[0].required_blocks.get(&Location::NightShift),
            Some(&8)
        );
    }

    #[test]
    fn rejects_unknown_location() {
        let broken = SNAPSHOT.replace("\"ED cover\"", "\"Clinic\"");
        assert!(matches!(
            SnapshotImporter::from_reader(broken.as_bytes()),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn rejects_assignment_to_unknown_employee() {
        let broken = SNAPSHOT.replace("\"employee\": \"R2a A\"}", "\"employee\": \"Nobody\"}");
        assert!(matches!(
            SnapshotImporter::from_reader(broken.as_bytes()),
            Err(ImportError::Schedule(ScheduleError::UnknownAssignee { .. }))
        ));
    }
}
