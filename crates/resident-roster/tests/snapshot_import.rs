use std::io::Cursor;

use resident_roster::domain::{AvailabilityType, ResidentLevel};
use resident_roster::ingest::{AvailabilityCsvImporter, ImportError, SnapshotImporter};
use resident_roster::scoring::{HardMediumSoftScore, RuleId, ScoringConfig, ScoringEngine};

const SNAPSHOT: &str = r#"{
    "employees": [{"name": "R2a A", "level": "R2"}, {"name": "R3a P", "level": "r3"}],
    "shifts": [
        {"id": 7, "start": "2024-07-10T20:00:00", "end": "2024-07-11T08:00:00",
         "location": "Night Shift", "required_skill": "RESIDENT", "employee": "R2a A"}
    ]
}"#;

#[test]
fn csv_unavailability_reaches_the_engine() {
    let mut snapshot = SnapshotImporter::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot parses");
    assert_eq!(snapshot.employees[1].level, ResidentLevel::R3);

    let csv = "Employee,Date,Type\nR2a A,2024-07-10,UNAVAILABLE\nR3a P,2024-07-10,desired\n";
    let rows = AvailabilityCsvImporter::from_reader(Cursor::new(csv)).expect("csv parses");
    assert_eq!(rows[1].kind, AvailabilityType::Desired);
    snapshot.availabilities.extend(rows);

    let engine = ScoringEngine::new(ScoringConfig::default().only([RuleId::UnavailableEmployee]));
    assert_eq!(
        engine.score(&snapshot).expect("snapshot is valid"),
        HardMediumSoftScore::of(-100, 0, 0)
    );
}

#[test]
fn shift_ending_before_it_starts_is_rejected() {
    let broken = SNAPSHOT.replace("2024-07-11T08:00:00", "2024-07-10T08:00:00");
    let result = SnapshotImporter::from_reader(Cursor::new(broken));
    assert!(matches!(result, Err(ImportError::Schedule(_))));
}

#[test]
fn scoring_config_round_trips_through_json() {
    let config = ScoringConfig::default()
        .enable(RuleId::PedsForR3InJune)
        .disable(RuleId::DesiredDay);
    let json = serde_json::to_string(&config).expect("config serializes");
    let parsed = ScoringConfig::from_reader(json.as_bytes()).expect("config parses");
    assert_eq!(parsed, config);
    assert!(parsed.is_enabled(RuleId::PedsForR3InJune));
    assert!(!parsed.is_enabled(RuleId::DesiredDay));
}
