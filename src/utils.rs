use chrono::{Datelike as _, Local, NaiveDate, Weekday};
use sea_orm::prelude::DateTimeWithTimeZone;

pub fn now() -> DateTimeWithTimeZone {
    Local::now().fixed_offset()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts the days between `start` and `end` (both inclusive) that are not a weekend
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> i32 {
    start.iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !is_weekend(*day))
        .count() as i32
}
