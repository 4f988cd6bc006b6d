use super::common::*;
use crate::domain::{Location, ResidentLevel, ScheduleError, ScheduleSnapshot, ShiftId};
use crate::scoring::{HardMediumSoftScore, RuleId, ScoreLevel, ScoringConfig, ScoringEngine};

fn small_roster() -> ScheduleSnapshot {
    let mut shifts = night_weeks(1, date(2024, 7, 7), 2, "R2a A");
    shifts.extend([
        assigned(10, at(2024, 7, 2, 17), 7, Location::EdCover, "R2b B"),
        assigned(11, at(2024, 7, 13, 8), 24, Location::EdCover, "R2b B"),
        assigned(12, at(2024, 7, 14, 8), 24, Location::EdCover, "R2b B"),
        shift(13, at(2024, 7, 20, 8), 24, Location::EdCover),
        assigned(14, at(2024, 8, 5, 8), 14 * 24, Location::Peds, "R3a P"),
    ]);
    snapshot(
        vec![
            resident("R2a A", ResidentLevel::R2),
            resident("R2b B", ResidentLevel::R2),
            resident("R3a P", ResidentLevel::R3),
        ],
        shifts,
    )
    .with_availabilities(vec![unavailable("R2b B", date(2024, 7, 14))])
}

#[test]
fn consecutive_night_weeks_earn_one_point() {
    let snapshot = snapshot(
        vec![resident("R2a A", ResidentLevel::R2)],
        night_weeks(1, date(2024, 7, 7), 2, "R2a A"),
    );
    assert_eq!(
        rule_score(RuleId::NightFloatBlockReward, &snapshot),
        HardMediumSoftScore::of(0, 0, 1)
    );
}

#[test]
fn scoring_is_repeatable() {
    let engine = ScoringEngine::default();
    let snapshot = small_roster();
    let first = engine.explain(&snapshot).expect("snapshot is valid");
    let second = engine.explain(&snapshot).expect("snapshot is valid");
    assert_eq!(first, second);
    assert_eq!(
        engine.score(&snapshot).expect("snapshot is valid"),
        first.score
    );
}

#[test]
fn explanation_follows_catalog_order() {
    let explanation = ScoringEngine::default()
        .explain(&small_roster())
        .expect("snapshot is valid");
    let order: Vec<RuleId> = explanation.components.iter().map(|c| c.rule).collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);

    let total: HardMediumSoftScore = explanation.summary().iter().map(|rule| rule.score).sum();
    assert_eq!(total, explanation.score);
}

#[test]
fn summary_totals_each_rule() {
    let explanation = ScoringEngine::default()
        .explain(&small_roster())
        .expect("snapshot is valid");
    let summary = explanation.summary();

    let back_to_back = summary
        .iter()
        .find(|total| total.rule == RuleId::BackToBackWeekendEdCover)
        .expect("weekend pair is reported");
    assert_eq!(back_to_back.matches, 1);
    assert_eq!(back_to_back.score, HardMediumSoftScore::of(-10, 0, 0));

    let reward = summary
        .iter()
        .find(|total| total.rule == RuleId::NightFloatBlockReward)
        .expect("night block is rewarded");
    assert_eq!(reward.level, ScoreLevel::Soft);
    assert_eq!(reward.score, HardMediumSoftScore::of(0, 0, 1));

    assert!(summary.iter().all(|total| total.matches > 0));
}

#[test]
fn employee_view_lists_their_matches() {
    let explanation = ScoringEngine::default()
        .explain(&small_roster())
        .expect("snapshot is valid");
    let unavailable: Vec<_> = explanation
        .for_employee("R2b B")
        .filter(|component| component.rule == RuleId::UnavailableEmployee)
        .collect();
    // Saturday call ends on the 14th, Sunday call starts on it.
    assert_eq!(unavailable.len(), 2);
    assert!(unavailable.iter().all(|c| c.employees == vec!["R2b B".to_string()]));
}

#[test]
fn disabled_rules_are_silent() {
    let snapshot = small_roster();
    let engine = ScoringEngine::new(ScoringConfig::default().disable(RuleId::UnavailableEmployee));
    let explanation = engine.explain(&snapshot).expect("snapshot is valid");
    assert_eq!(explanation.rule_score(RuleId::UnavailableEmployee), HardMediumSoftScore::ZERO);
    assert!(!engine.rule_ids().contains(&RuleId::UnavailableEmployee));
}

#[test]
fn opt_in_rules_can_be_evaluated_on_demand() {
    let snapshot = snapshot(
        vec![resident("R2a A", ResidentLevel::R2)],
        vec![
            assigned(1, at(2024, 7, 1, 7), 10, Location::DayShift, "R2a A"),
            assigned(2, at(2024, 7, 2, 1), 7, Location::EdCover, "R2a A"),
        ],
    );
    let engine = ScoringEngine::default();
    assert!(!engine.rule_ids().contains(&RuleId::MinimumRestBetweenShifts));

    let explanation = engine
        .evaluate_rule(RuleId::MinimumRestBetweenShifts, &snapshot)
        .expect("snapshot is valid");
    assert_eq!(explanation.score, HardMediumSoftScore::of(0, -2, 0));
    assert_eq!(
        explanation.components[0].shift_ids,
        vec![ShiftId(1), ShiftId(2)]
    );
}

#[test]
fn ir_block_may_run_into_an_evening_shift() {
    let snapshot = snapshot(
        vec![resident("R2a A", ResidentLevel::R2)],
        vec![
            assigned(1, at(2024, 7, 1, 7), 5, Location::Ir, "R2a A"),
            assigned(2, at(2024, 7, 1, 14), 10, Location::DayShift, "R2a A"),
        ],
    );
    assert_eq!(
        rule_score(RuleId::MinimumRestBetweenShifts, &snapshot),
        HardMediumSoftScore::ZERO
    );
}

#[test]
fn four_week_hours_over_the_limit() {
    let light = snapshot(
        vec![resident("R2a A", ResidentLevel::R2)],
        night_weeks(1, date(2024, 7, 7), 3, "R2a A"),
    );
    // Night starts count 60h each.
    assert_eq!(
        rule_score(RuleId::FourWeekWorkingHours, &light),
        HardMediumSoftScore::ZERO
    );

    let mut heavy = night_weeks(1, date(2024, 7, 7), 3, "R2a A");
    heavy.extend((0..8).map(|day| {
        assigned(
            10 + day,
            at(2024, 7, 1, 7) + chrono::Duration::days(day as i64 * 3),
            24,
            Location::EdCover,
            "R2a A",
        )
    }));
    let heavy = snapshot(vec![resident("R2a A", ResidentLevel::R2)], heavy);
    // 180h of nights + 192h of ED cover = 372h against 320h.
    assert_eq!(
        rule_score(RuleId::FourWeekWorkingHours, &heavy),
        HardMediumSoftScore::of(0, 0, -52)
    );
}

#[test]
fn ir_block_after_sunday_call() {
    let snapshot = snapshot(
        vec![resident("R3a P", ResidentLevel::R3)],
        vec![
            assigned(1, at(2024, 7, 7, 8), 24, Location::EdCover, "R3a P"),
            assigned(2, at(2024, 7, 8, 8), 9, Location::Ir, "R3a P"),
        ],
    );
    assert_eq!(
        rule_score(RuleId::BlockAfterSundayEdCover, &snapshot),
        HardMediumSoftScore::of(0, 0, -1)
    );
}

#[test]
fn malformed_snapshots_are_rejected() {
    let engine = ScoringEngine::default();

    let duplicate = snapshot(
        vec![resident("R2a A", ResidentLevel::R2)],
        vec![
            shift(1, at(2024, 7, 2, 17), 7, Location::EdCover),
            shift(1, at(2024, 7, 3, 17), 7, Location::EdCover),
        ],
    );
    assert!(matches!(
        engine.score(&duplicate),
        Err(ScheduleError::DuplicateShift(id)) if id == ShiftId(1)
    ));

    let stranger = snapshot(
        vec![resident("R2a A", ResidentLevel::R2)],
        vec![assigned(1, at(2024, 7, 2, 17), 7, Location::EdCover, "Nobody")],
    );
    assert!(matches!(
        engine.explain(&stranger),
        Err(ScheduleError::UnknownAssignee { .. })
    ));

    let unknown_availability = snapshot(vec![resident("R2a A", ResidentLevel::R2)], Vec::new())
        .with_availabilities(vec![unavailable("Nobody", date(2024, 7, 2))]);
    assert!(matches!(
        engine.score(&unknown_availability),
        Err(ScheduleError::UnknownAvailabilityEmployee { .. })
    ));
}
