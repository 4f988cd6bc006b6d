use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScoreLevel;

/// Stable identity of every rule the engine knows. Catalog order follows
/// `RuleId::ordered()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    OverlappingShifts,
    UnavailableEmployee,
    UnavailableEmployeeForPediatrics,
    DesiredDay,
    UndesiredDay,
    UnassignedMandatoryShift,
    EdCoverBeforeNightFloat,
    FridayEdCoverBeforeSaturdayShift,
    BackToBackWeekendEdCover,
    SundayEdCoverAfterNightFloat,
    SaturdayEdCoverAfterNightFloat,
    ShiftAfterSundayEdCover,
    ExcessFridayEdCover,
    WeekendShiftNearUnavailability,
    MinimumWeekendEdCover,
    MinimumWeekdayEdCover,
    MaximumWeekendEdCover,
    MaximumWeekdayEdCover,
    MinimumNightFloat,
    MaximumNightFloat,
    MaximumPedsShifts,
    PedsDuringHolidays,
    OverlappingPedsBetweenResidents,
    PedsForR4InJune,
    NamedResidentPedsOverlap,
    FridayEdCoverBalance,
    WeekendShiftBalance,
    EveningShiftBalance,
    NightFloatBalance,
    SaturdaySundayBalance,
    NightFloatBlockReward,
    RequiredShiftTypes,
    WeekdayAndWeekendEdCover,
    MinimumRestBetweenShifts,
    FourWeekWorkingHours,
    PedsForR3InJune,
    PedsConcurrencyLimit,
    BlockAfterSundayEdCover,
}

impl RuleId {
    pub fn ordered() -> Vec<RuleId> {
        vec![
            RuleId::OverlappingShifts,
            RuleId::UnavailableEmployee,
            RuleId::UnavailableEmployeeForPediatrics,
            RuleId::DesiredDay,
            RuleId::UndesiredDay,
            RuleId::UnassignedMandatoryShift,
            RuleId::EdCoverBeforeNightFloat,
            RuleId::FridayEdCoverBeforeSaturdayShift,
            RuleId::BackToBackWeekendEdCover,
            RuleId::SundayEdCoverAfterNightFloat,
            RuleId::SaturdayEdCoverAfterNightFloat,
            RuleId::ShiftAfterSundayEdCover,
            RuleId::ExcessFridayEdCover,
            RuleId::WeekendShiftNearUnavailability,
            RuleId::MinimumWeekendEdCover,
            RuleId::MinimumWeekdayEdCover,
            RuleId::MaximumWeekendEdCover,
            RuleId::MaximumWeekdayEdCover,
            RuleId::MinimumNightFloat,
            RuleId::MaximumNightFloat,
            RuleId::MaximumPedsShifts,
            RuleId::PedsDuringHolidays,
            RuleId::OverlappingPedsBetweenResidents,
            RuleId::PedsForR4InJune,
            RuleId::NamedResidentPedsOverlap,
            RuleId::FridayEdCoverBalance,
            RuleId::WeekendShiftBalance,
            RuleId::EveningShiftBalance,
            RuleId::NightFloatBalance,
            RuleId::SaturdaySundayBalance,
            RuleId::NightFloatBlockReward,
            RuleId::RequiredShiftTypes,
            RuleId::WeekdayAndWeekendEdCover,
            RuleId::MinimumRestBetweenShifts,
            RuleId::FourWeekWorkingHours,
            RuleId::PedsForR3InJune,
            RuleId::PedsConcurrencyLimit,
            RuleId::BlockAfterSundayEdCover,
        ]
    }

    /// Rules registered unless explicitly disabled. The rest are opt-in.
    pub fn enabled_by_default(self) -> bool {
        !matches!(
            self,
            RuleId::MinimumRestBetweenShifts
                | RuleId::FourWeekWorkingHours
                | RuleId::PedsForR3InJune
                | RuleId::PedsConcurrencyLimit
                | RuleId::BlockAfterSundayEdCover
        )
    }

    pub fn level(self) -> ScoreLevel {
        match self {
            RuleId::FridayEdCoverBeforeSaturdayShift
            | RuleId::SundayEdCoverAfterNightFloat
            | RuleId::ExcessFridayEdCover
            | RuleId::MinimumWeekdayEdCover
            | RuleId::MaximumWeekdayEdCover
            | RuleId::OverlappingPedsBetweenResidents
            | RuleId::EveningShiftBalance
            | RuleId::MinimumRestBetweenShifts => ScoreLevel::Medium,
            RuleId::DesiredDay
            | RuleId::UndesiredDay
            | RuleId::FridayEdCoverBalance
            | RuleId::NightFloatBlockReward
            | RuleId::FourWeekWorkingHours
            | RuleId::BlockAfterSundayEdCover => ScoreLevel::Soft,
            _ => ScoreLevel::Hard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RuleId::OverlappingShifts => "Overlapping shift",
            RuleId::UnavailableEmployee => {
                "Unavailable employee including shift span, excluding Pediatrics"
            }
            RuleId::UnavailableEmployeeForPediatrics => {
                "Penalize Pediatrics shifts starting or ending on an unavailable employee day"
            }
            RuleId::DesiredDay => "Desired day for employee",
            RuleId::UndesiredDay => "Undesired day for employee",
            RuleId::UnassignedMandatoryShift => "Unassigned mandatory shifts",
            RuleId::EdCoverBeforeNightFloat => {
                "Prevent ED cover shifts ending right before night block shifts"
            }
            RuleId::FridayEdCoverBeforeSaturdayShift => {
                "Prevent ED cover shifts on Friday with a proceeding shift on Saturday"
            }
            RuleId::BackToBackWeekendEdCover => "No 24 shift after 24-hour weekend shift",
            RuleId::SundayEdCoverAfterNightFloat => {
                "Penalize 24-hour ED cover shift on Sunday directly after a night shift block"
            }
            RuleId::SaturdayEdCoverAfterNightFloat => {
                "No 24-hour ED cover shift on Saturday directly after a night shift block"
            }
            RuleId::ShiftAfterSundayEdCover => "No shift after 24-hour sunday weekend shift",
            RuleId::ExcessFridayEdCover => "Penalize excess Friday shifts for R4 residents",
            RuleId::WeekendShiftNearUnavailability => {
                "Penalize 24-hour shifts around unavailability, excluding night shifts"
            }
            RuleId::MinimumWeekendEdCover => "Minimum weekend shifts for R2, R3, R4 residents",
            RuleId::MinimumWeekdayEdCover => "Minimum weekday shifts for R2, R3, R4 residents",
            RuleId::MaximumWeekendEdCover => "Maximum weekend shifts for R2, R3, R4 residents",
            RuleId::MaximumWeekdayEdCover => "Maximum weekday shifts for R2, R3, R4 residents",
            RuleId::MinimumNightFloat => "Minimum night float shifts for R2, R3, R4 residents",
            RuleId::MaximumNightFloat => "Maximum night float shifts for R2, R3, R4 residents",
            RuleId::MaximumPedsShifts => "Maximum pediatric shifts per resident",
            RuleId::PedsDuringHolidays => "Penalize pediatric shifts that include holidays",
            RuleId::OverlappingPedsBetweenResidents => {
                "No overlapping pediatric shifts between different residents"
            }
            RuleId::PedsForR4InJune => "Pediatric away shifts cannot be assigned to R4 in June",
            RuleId::NamedResidentPedsOverlap => "No overlapping pediatric shifts of named resident",
            RuleId::FridayEdCoverBalance => "Friday ED cover shifts balancing",
            RuleId::WeekendShiftBalance => "Weekend shifts balancing",
            RuleId::EveningShiftBalance => "Evening shifts balancing",
            RuleId::NightFloatBalance => "Night shifts balancing",
            RuleId::SaturdaySundayBalance => {
                "Balance Saturday and Sunday shifts for each employee type"
            }
            RuleId::NightFloatBlockReward => {
                "Reward consecutive night float blocks with sufficient breaks"
            }
            RuleId::RequiredShiftTypes => {
                "Ensure at least one shift per required type for all residents"
            }
            RuleId::WeekdayAndWeekendEdCover => {
                "Ensure at least one weekend and one weekday ED cover shift for all residents"
            }
            RuleId::MinimumRestBetweenShifts => "At least 10 hours between 2 shifts",
            RuleId::FourWeekWorkingHours => "Maximum working hours in four-week period",
            RuleId::PedsForR3InJune => "Pediatric away shifts cannot be assigned to R3 in June",
            RuleId::PedsConcurrencyLimit => {
                "Only two residents can overlap for pediatric shifts at a time"
            }
            RuleId::BlockAfterSundayEdCover => "Penalize block schedule after 24-hour Sunday shift",
        }
    }

    fn key(self) -> String {
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule '{0}'")]
pub struct UnknownRule(pub String);

impl FromStr for RuleId {
    type Err = UnknownRule;

    /// Accepts the snake_case key (`overlapping_shifts`) or the display label.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        RuleId::ordered()
            .into_iter()
            .find(|rule| rule.key() == wanted || rule.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRule(value.to_string()))
    }
}
