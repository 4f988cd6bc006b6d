use serde::Serialize;

use super::counts::ResidentShiftCounts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftCountRow {
    pub employee: String,
    pub level: String,
    pub call_shifts: usize,
    pub evening: usize,
    pub weekend: usize,
    pub peds: usize,
    pub night: usize,
    pub day: usize,
    pub ir: usize,
    pub saturday_ed_cover: usize,
    pub sunday_ed_cover: usize,
    pub friday_ed_cover: usize,
    pub by_location: Vec<(String, usize)>,
}

impl ShiftCountRow {
    pub(super) fn new(employee: &str, counts: &ResidentShiftCounts) -> Self {
        Self {
            employee: employee.to_string(),
            level: counts
                .level
                .as_ref()
                .map(|level| level.to_string())
                .unwrap_or_else(|| "?".to_string()),
            call_shifts: counts.call_shifts,
            evening: counts.evening,
            weekend: counts.weekend,
            peds: counts.peds,
            night: counts.night,
            day: counts.day,
            ir: counts.ir,
            saturday_ed_cover: counts.saturday_ed_cover,
            sunday_ed_cover: counts.sunday_ed_cover,
            friday_ed_cover: counts.friday_ed_cover,
            by_location: counts
                .by_location
                .iter()
                .map(|(location, count)| (location.label().to_string(), *count))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnassignedSummary {
    pub mandatory: usize,
    pub optional: usize,
}
