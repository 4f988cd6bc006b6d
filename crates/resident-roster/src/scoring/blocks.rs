//! Sequence analysis over start-sorted shift lists: block grouping, overlap
//! sweeps and adjacency lookups shared by several rules.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::Shift;

use super::config::BlockPolicy;

/// Maximal run of one employee's shifts with short gaps between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftBlock<'a> {
    shifts: Vec<&'a Shift>,
}

impl<'a> ShiftBlock<'a> {
    pub fn shifts(&self) -> &[&'a Shift] {
        &self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.shifts.first().map(|shift| shift.start)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.shifts.last().map(|shift| shift.end)
    }
}

/// Sorts by start and merges while the whole hours from one end to the next
/// start stay within `max_gap_hours`.
pub fn group_blocks<'a>(
    shifts: impl IntoIterator<Item = &'a Shift>,
    max_gap_hours: i64,
) -> Vec<ShiftBlock<'a>> {
    let mut sorted: Vec<&'a Shift> = shifts.into_iter().collect();
    sorted.sort_by_key(|shift| (shift.start, shift.id));

    let mut blocks: Vec<ShiftBlock<'a>> = Vec::new();
    for shift in sorted {
        match blocks.last_mut() {
            Some(block)
                if block
                    .end()
                    .is_some_and(|end| (shift.start - end).num_hours() <= max_gap_hours) =>
            {
                block.shifts.push(shift);
            }
            _ => blocks.push(ShiftBlock {
                shifts: vec![shift],
            }),
        }
    }
    blocks
}

/// Blocks that start at least `min_separation_weeks` whole weeks after the
/// previous eligible block ended. The first block is always eligible.
pub fn eligible_blocks<'b, 'a>(
    blocks: &'b [ShiftBlock<'a>],
    min_separation_weeks: i64,
) -> Vec<&'b ShiftBlock<'a>> {
    let mut eligible = Vec::new();
    let mut last_end: Option<NaiveDateTime> = None;
    for block in blocks {
        let (Some(start), Some(end)) = (block.start(), block.end()) else {
            continue;
        };
        let separated = last_end
            .map(|previous| (start - previous).num_weeks() >= min_separation_weeks)
            .unwrap_or(true);
        if separated {
            eligible.push(block);
            last_end = Some(end);
        }
    }
    eligible
}

/// Reward for one eligible block: one point per shift past the first, capped.
pub fn block_reward(block_len: usize, cap: i64) -> i64 {
    if block_len < 2 {
        return 0;
    }
    (block_len as i64 - 1).min(cap)
}

/// Total reward for one employee's night-float shifts.
pub fn night_float_reward<'a>(
    shifts: impl IntoIterator<Item = &'a Shift>,
    policy: &BlockPolicy,
) -> (i64, Vec<ShiftBlock<'a>>) {
    let blocks = group_blocks(shifts, policy.max_gap_hours);
    let rewarded: Vec<ShiftBlock<'a>> = eligible_blocks(&blocks, policy.min_separation_weeks)
        .into_iter()
        .filter(|block| block_reward(block.len(), policy.reward_cap) > 0)
        .cloned()
        .collect();
    let total = rewarded
        .iter()
        .map(|block| block_reward(block.len(), policy.reward_cap))
        .sum();
    (total, rewarded)
}

pub fn intervals_overlap(a: &Shift, b: &Shift) -> bool {
    a.start < b.end && b.start < a.end
}

/// Overlapping pairs from a start-sorted list. Each later shift is compared
/// only while it starts before the earlier one ends.
pub fn overlapping_pairs<'a>(sorted: &[&'a Shift]) -> Vec<(&'a Shift, &'a Shift)> {
    let mut pairs = Vec::new();
    for (i, first) in sorted.iter().enumerate() {
        for second in &sorted[i + 1..] {
            if second.start >= first.end {
                break;
            }
            if intervals_overlap(first, second) {
                pairs.push((*first, *second));
            }
        }
    }
    pairs
}

/// Shifts in a start-sorted list starting exactly at `instant`.
pub fn starting_at<'s, 'a>(sorted: &'s [&'a Shift], instant: NaiveDateTime) -> &'s [&'a Shift] {
    starting_between(sorted, instant, instant + Duration::nanoseconds(1))
}

/// Shifts in a start-sorted list whose start falls on `date`.
pub fn starting_on<'s, 'a>(sorted: &'s [&'a Shift], date: NaiveDate) -> &'s [&'a Shift] {
    let from = date.and_time(chrono::NaiveTime::MIN);
    starting_between(sorted, from, from + Duration::days(1))
}

/// Shifts in a start-sorted list with `from <= start < until`.
pub fn starting_between<'s, 'a>(
    sorted: &'s [&'a Shift],
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> &'s [&'a Shift] {
    let lower = sorted.partition_point(|shift| shift.start < from);
    let upper = sorted.partition_point(|shift| shift.start < until);
    &sorted[lower..upper.max(lower)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
            + Duration::days(i64::from(day))
    }

    fn night(id: u64, start: NaiveDateTime, nights: i64) -> Shift {
        Shift::new(id, start, start + Duration::hours(24 * nights - 12), Location::NightShift, "RESIDENT")
            .expect("valid shift")
    }

    #[test]
    fn sixty_hour_gap_keeps_block_together() {
        // Sun 20:00 -> Fri 08:00, next one Sun 20:00: exactly 60 hours apart.
        let first = night(1, at(6, 20), 5);
        let second = night(2, at(13, 20), 5);
        let blocks = group_blocks([&first, &second], 60);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len(), 2);
    }

    #[test]
    fn longer_gap_splits_block() {
        let first = night(1, at(6, 20), 5);
        let second = night(2, at(14, 20), 5);
        let blocks = group_blocks([&second, &first], 60);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].shifts()[0].id, first.id);
    }

    #[test]
    fn blocks_closer_than_four_weeks_are_not_eligible() {
        let a = night(1, at(6, 20), 5);
        let b = night(2, at(13, 20), 5);
        let c = night(3, at(27, 20), 5);
        let d = night(4, at(34, 20), 5);
        let blocks = group_blocks([&a, &b, &c, &d], 60);
        assert_eq!(blocks.len(), 2);
        assert_eq!(eligible_blocks(&blocks, 4).len(), 1);
    }

    #[test]
    fn reward_is_capped() {
        assert_eq!(block_reward(1, 3), 0);
        assert_eq!(block_reward(2, 3), 1);
        assert_eq!(block_reward(4, 3), 3);
        assert_eq!(block_reward(9, 3), 3);
    }

    #[test]
    fn overlap_sweep_ignores_back_to_back() {
        let a = Shift::new(1, at(0, 8), at(0, 14), Location::DayShift, "RESIDENT").expect("valid");
        let b = Shift::new(2, at(0, 14), at(0, 20), Location::DayShift, "RESIDENT").expect("valid");
        let c = Shift::new(3, at(0, 10), at(0, 16), Location::DayShift, "RESIDENT").expect("valid");
        let mut sorted = vec![&a, &b, &c];
        sorted.sort_by_key(|shift| shift.start);
        let pairs = overlapping_pairs(&sorted);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(x, y)| !(x.id == a.id && y.id == b.id)));
    }

    #[test]
    fn adjacency_lookups_use_start_ordering() {
        let a = Shift::new(1, at(0, 8), at(0, 14), Location::DayShift, "RESIDENT").expect("valid");
        let b = Shift::new(2, at(0, 14), at(0, 20), Location::DayShift, "RESIDENT").expect("valid");
        let c = Shift::new(3, at(1, 8), at(1, 14), Location::DayShift, "RESIDENT").expect("valid");
        let sorted = vec![&a, &b, &c];
        assert_eq!(starting_at(&sorted, at(0, 14)).len(), 1);
        assert_eq!(starting_on(&sorted, at(0, 0).date()).len(), 2);
        assert!(starting_at(&sorted, at(0, 15)).is_empty());
    }
}
