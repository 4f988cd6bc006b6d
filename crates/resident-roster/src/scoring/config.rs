use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::RuleId;
use crate::domain::{Location, ResidentLevel, Rotation};

/// Rule weights, thresholds and fixed calendars. `Default` carries the
/// production residency tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub quotas: QuotaTable,
    pub holidays: Vec<NaiveDate>,
    pub required_locations: Vec<Location>,
    /// Resident pairs allowed to hold overlapping pediatric blocks.
    pub peds_overlap_whitelist: Vec<(String, String)>,
    /// Resident whose pediatric block may not overlap anyone's, at hard weight.
    pub named_peds_resident: Option<String>,
    pub friday_ed_cover_limit: FridayLimit,
    pub evening_start: NaiveTime,
    pub night_start: NaiveTime,
    pub night_float_blocks: BlockPolicy,
    /// Let a rotation's "Night Shift" requirement replace the night-float minimum.
    pub rotation_minimums: bool,
    pub disabled_rules: BTreeSet<RuleId>,
    pub extra_rules: BTreeSet<RuleId>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            quotas: QuotaTable::default(),
            holidays: vec![
                date(2024, 7, 4),
                date(2024, 9, 2),
                date(2024, 11, 28),
                date(2024, 12, 25),
                date(2025, 1, 1),
                date(2025, 5, 26),
            ],
            required_locations: vec![Location::NightShift, Location::EdCover, Location::Peds],
            peds_overlap_whitelist: Vec::new(),
            named_peds_resident: Some("R4a RC".to_string()),
            friday_ed_cover_limit: FridayLimit::default(),
            evening_start: time(14, 0),
            night_start: time(20, 0),
            night_float_blocks: BlockPolicy::default(),
            rotation_minimums: false,
            disabled_rules: BTreeSet::new(),
            extra_rules: BTreeSet::new(),
        }
    }
}

impl ScoringConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        if self.disabled_rules.contains(&rule) {
            return false;
        }
        rule.enabled_by_default() || self.extra_rules.contains(&rule)
    }

    pub fn enable(mut self, rule: RuleId) -> Self {
        self.disabled_rules.remove(&rule);
        self.extra_rules.insert(rule);
        self
    }

    pub fn disable(mut self, rule: RuleId) -> Self {
        self.disabled_rules.insert(rule);
        self
    }

    /// Only the listed rules, regardless of defaults.
    pub fn only(mut self, rules: impl IntoIterator<Item = RuleId>) -> Self {
        let wanted: BTreeSet<RuleId> = rules.into_iter().collect();
        self.disabled_rules = RuleId::ordered()
            .into_iter()
            .filter(|rule| !wanted.contains(rule))
            .collect();
        self.extra_rules = wanted;
        self
    }

    pub fn peds_overlap_allowed(&self, first: &str, second: &str) -> bool {
        self.peds_overlap_whitelist
            .iter()
            .any(|(a, b)| (a == first && b == second) || (a == second && b == first))
    }

    pub fn quota_bounds(
        &self,
        class: QuotaClass,
        level: &ResidentLevel,
        rotations: &[Rotation],
    ) -> QuotaBounds {
        let mut bounds = self.quotas.bounds(class, level);
        if self.rotation_minimums && class == QuotaClass::NightFloat {
            if let Some(required) = rotations
                .iter()
                .filter(|rotation| &rotation.level == level)
                .find_map(|rotation| rotation.required_blocks.get(&Location::NightShift))
            {
                bounds.min = Some(*required);
            }
        }
        bounds
    }
}

/// Shift families with per-level count requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaClass {
    WeekdayEdCover,
    WeekendEdCover,
    NightFloat,
}

/// Inclusive count window; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl QuotaBounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaTable {
    pub weekday_ed_cover: BTreeMap<ResidentLevel, QuotaBounds>,
    pub weekend_ed_cover: BTreeMap<ResidentLevel, QuotaBounds>,
    pub night_float: BTreeMap<ResidentLevel, QuotaBounds>,
}

impl Default for QuotaTable {
    fn default() -> Self {
        Self {
            weekday_ed_cover: BTreeMap::from([
                (ResidentLevel::R2, QuotaBounds::new(50, 75)),
                (ResidentLevel::R3, QuotaBounds::new(30, 65)),
                (ResidentLevel::R4, QuotaBounds::new(20, 45)),
            ]),
            weekend_ed_cover: BTreeMap::from([
                (ResidentLevel::R2, QuotaBounds::new(20, 25)),
                (ResidentLevel::R3, QuotaBounds::new(15, 20)),
                (ResidentLevel::R4, QuotaBounds::new(10, 14)),
            ]),
            night_float: BTreeMap::from([
                (ResidentLevel::R2, QuotaBounds::new(8, 12)),
                (ResidentLevel::R3, QuotaBounds::new(7, 9)),
                (ResidentLevel::R4, QuotaBounds::new(6, 7)),
            ]),
        }
    }
}

impl QuotaTable {
    pub fn bounds(&self, class: QuotaClass, level: &ResidentLevel) -> QuotaBounds {
        let table = match class {
            QuotaClass::WeekdayEdCover => &self.weekday_ed_cover,
            QuotaClass::WeekendEdCover => &self.weekend_ed_cover,
            QuotaClass::NightFloat => &self.night_float,
        };
        table.get(level).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FridayLimit {
    pub level: ResidentLevel,
    pub max_shifts: u32,
}

impl Default for FridayLimit {
    fn default() -> Self {
        Self {
            level: ResidentLevel::R4,
            max_shifts: 5,
        }
    }
}

/// Night-float block grouping and reward shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPolicy {
    pub max_gap_hours: i64,
    pub min_separation_weeks: i64,
    pub reward_cap: i64,
}

impl Default for BlockPolicy {
    fn default() -> Self {
        Self {
            max_gap_hours: 60,
            min_separation_weeks: 4,
            reward_cap: 3,
        }
    }
}

// Literal calendar constants only; the inputs are fixed and valid.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}
