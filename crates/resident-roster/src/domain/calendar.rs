//! Calendar classification of shifts. Weekday membership is always taken from
//! the start instant.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use super::{Location, Shift};

pub fn starts_on(shift: &Shift, weekday: Weekday) -> bool {
    shift.start.weekday() == weekday
}

pub fn ends_on(shift: &Shift, weekday: Weekday) -> bool {
    shift.end.weekday() == weekday
}

pub fn is_weekend(shift: &Shift) -> bool {
    matches!(shift.start.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_ed_cover(shift: &Shift) -> bool {
    shift.location == Location::EdCover
}

pub fn is_weekend_ed_cover(shift: &Shift) -> bool {
    is_ed_cover(shift) && is_weekend(shift)
}

pub fn is_weekday_ed_cover(shift: &Shift) -> bool {
    is_ed_cover(shift) && !is_weekend(shift)
}

pub fn is_night_float(shift: &Shift) -> bool {
    shift.location == Location::NightShift
}

pub fn is_peds(shift: &Shift) -> bool {
    shift.location == Location::Peds
}

pub fn is_ir_block(shift: &Shift) -> bool {
    shift.location == Location::Ir
}

pub fn starts_at(shift: &Shift, time: NaiveTime) -> bool {
    shift.start.time() == time
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Inclusive calendar-day span of a shift.
pub fn spans_date(shift: &Shift, date: NaiveDate) -> bool {
    shift.start.date() <= date && date <= shift.end.date()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn week_start_rolls_back_to_monday() {
        assert_eq!(week_start(date(2024, 7, 5)), date(2024, 7, 1));
        assert_eq!(week_start(date(2024, 7, 7)), date(2024, 7, 1));
        assert_eq!(week_start(date(2024, 7, 8)), date(2024, 7, 8));
    }

    #[test]
    fn weekend_ed_cover_uses_start_day() {
        let start = date(2024, 7, 6).and_hms_opt(8, 0, 0).expect("valid time");
        let shift = Shift::new(1, start, start + Duration::hours(24), Location::EdCover, "RESIDENT")
            .expect("valid shift");
        assert!(is_weekend_ed_cover(&shift));
        assert!(!is_weekday_ed_cover(&shift));
        assert!(spans_date(&shift, date(2024, 7, 7)));
        assert!(!spans_date(&shift, date(2024, 7, 8)));
    }
}
