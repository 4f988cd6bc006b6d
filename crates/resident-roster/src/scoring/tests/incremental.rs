use super::common::*;
use crate::domain::{Location, ResidentLevel, ScheduleError, ScheduleSnapshot, ShiftId};
use crate::scoring::{RuleId, ScoringConfig, ScoringEngine};

fn roster() -> ScheduleSnapshot {
    let mut shifts = night_weeks(1, date(2024, 7, 7), 3, "R2a A");
    shifts.extend([
        assigned(10, at(2024, 7, 5, 17), 7, Location::EdCover, "R2b B"),
        assigned(11, at(2024, 7, 6, 8), 24, Location::EdCover, "R2b B"),
        shift(12, at(2024, 7, 7, 8), 24, Location::EdCover),
        shift(13, at(2024, 7, 8, 7), 120, Location::Ir),
        assigned(14, at(2024, 7, 1, 8), 14 * 24, Location::Peds, "R3a P"),
        shift(15, at(2024, 7, 8, 8), 14 * 24, Location::Peds),
        assigned(16, at(2024, 7, 9, 14), 10, Location::DayShift, "R3b Q"),
        shift(17, at(2024, 7, 13, 8), 24, Location::EdCover).optional(),
    ]);
    snapshot(
        vec![
            resident("R2a A", ResidentLevel::R2),
            resident("R2b B", ResidentLevel::R2),
            resident("R3a P", ResidentLevel::R3),
            resident("R3b Q", ResidentLevel::R3),
            resident("R4a RC", ResidentLevel::R4),
        ],
        shifts,
    )
    .with_availabilities(vec![
        unavailable("R2b B", date(2024, 7, 7)),
        unavailable("R3b Q", date(2024, 7, 13)),
    ])
}

fn assert_matches_full(engine: &ScoringEngine, scorer: &crate::scoring::IncrementalScorer<'_>) {
    let full = engine.explain(scorer.snapshot()).expect("snapshot is valid");
    assert_eq!(scorer.score(), full.score);
    assert_eq!(scorer.explain(), full);
}

#[test]
fn seeded_scorer_matches_full_evaluation() {
    let engine = ScoringEngine::default();
    let scorer = engine.incremental(roster()).expect("snapshot is valid");
    assert_matches_full(&engine, &scorer);
}

#[test]
fn moves_keep_score_in_step_with_full_evaluation() {
    let config = ScoringConfig::default()
        .enable(RuleId::MinimumRestBetweenShifts)
        .enable(RuleId::FourWeekWorkingHours)
        .enable(RuleId::PedsConcurrencyLimit)
        .enable(RuleId::BlockAfterSundayEdCover);
    let engine = ScoringEngine::new(config);
    let mut scorer = engine.incremental(roster()).expect("snapshot is valid");

    let moves: [(u64, Option<&str>); 10] = [
        (12, Some("R2b B")),
        (13, Some("R2b B")),
        (15, Some("R4a RC")),
        (15, Some("R3b Q")),
        (2, Some("R3a P")),
        (2, None),
        (17, Some("R3b Q")),
        (10, Some("R2a A")),
        (11, None),
        (14, Some("R4a RC")),
    ];
    for (shift, employee) in moves {
        let score = scorer
            .assign(ShiftId(shift), employee)
            .expect("known shift and employee");
        assert_eq!(score, scorer.score());
        assert_matches_full(&engine, &scorer);
    }
}

#[test]
fn first_shift_of_any_location_brings_resident_into_type_check() {
    let engine = ScoringEngine::default();
    let mut scorer = engine.incremental(roster()).expect("snapshot is valid");
    let required = |scorer: &crate::scoring::IncrementalScorer<'_>| {
        scorer
            .explain()
            .for_employee("R4a RC")
            .filter(|component| component.rule == RuleId::RequiredShiftTypes)
            .map(|component| component.score)
            .sum::<i64>()
    };
    assert_eq!(required(&scorer), 0);

    scorer
        .assign(ShiftId(13), Some("R4a RC"))
        .expect("known shift and employee");
    assert_eq!(required(&scorer), -300);
    assert_matches_full(&engine, &scorer);

    scorer.assign(ShiftId(13), None).expect("known shift");
    assert_eq!(required(&scorer), 0);
    assert_matches_full(&engine, &scorer);
}

#[test]
fn unchanged_assignment_is_a_no_op() {
    let engine = ScoringEngine::default();
    let mut scorer = engine.incremental(roster()).expect("snapshot is valid");
    let before = scorer.explain();
    let score = scorer
        .assign(ShiftId(11), Some("R2b B"))
        .expect("known shift and employee");
    assert_eq!(score, before.score);
    assert_eq!(scorer.explain(), before);
}

#[test]
fn unknown_facts_are_rejected_without_changes() {
    let engine = ScoringEngine::default();
    let mut scorer = engine.incremental(roster()).expect("snapshot is valid");
    let before = scorer.score();

    assert!(matches!(
        scorer.assign(ShiftId(99), Some("R2a A")),
        Err(ScheduleError::UnknownShift(id)) if id == ShiftId(99)
    ));
    assert!(matches!(
        scorer.assign(ShiftId(12), Some("Nobody")),
        Err(ScheduleError::UnknownEmployee(name)) if name == "Nobody"
    ));
    assert_eq!(scorer.score(), before);
    assert!(scorer
        .snapshot()
        .shift(ShiftId(12))
        .is_some_and(|shift| shift.employee.is_none()));
}

#[test]
fn invalid_seed_is_rejected() {
    let engine = ScoringEngine::default();
    let broken = roster().with_availabilities(vec![unavailable("Nobody", date(2024, 7, 1))]);
    assert!(engine.incremental(broken).is_err());
}

#[test]
fn into_snapshot_returns_the_moved_schedule() {
    let engine = ScoringEngine::default();
    let mut scorer = engine.incremental(roster()).expect("snapshot is valid");
    scorer
        .assign(ShiftId(12), Some("R2a A"))
        .expect("known shift and employee");
    let snapshot = scorer.into_snapshot();
    assert_eq!(
        snapshot
            .shift(ShiftId(12))
            .and_then(|shift| shift.employee.as_deref()),
        Some("R2a A")
    );
}
