//! Day, week and month bucketing for the calendar and Gantt surfaces.
//!
//! Weeks start on Sunday. Membership tests are done per bucket so a record
//! spanning a week or month boundary shows up in every bucket it touches.

use crate::layout::TimelineWindow;
use crate::model::Record;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketUnit {
    Day,
    Week,
    Month,
}

/// A discrete slice of time. `start..=end` is inclusive; day buckets have
/// `start == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBucket {
    pub unit: BucketUnit,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_weekend: bool,
    pub is_current: bool,
    pub column_span: usize,
}

impl DateBucket {
    pub fn day(date: NaiveDate, today: NaiveDate) -> Self {
        DateBucket {
            unit: BucketUnit::Day,
            start: date,
            end: date,
            is_weekend: is_weekend(date),
            is_current: date == today,
            column_span: 1,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn first_day_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as i64;
    date.checked_sub_signed(Duration::days(back)).unwrap_or(date)
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(28)
}

/// Signed whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Display week number: the week of the year counted from the Sunday-start
/// week holding January 1st.
pub fn week_number(date: NaiveDate) -> u32 {
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
    (date.ordinal0() + jan1.weekday().num_days_from_sunday()) / 7 + 1
}

/// One bucket per day in `[window.start, window.end)`.
pub fn enumerate_days(window: &TimelineWindow, today: NaiveDate) -> Vec<DateBucket> {
    window
        .start
        .iter_days()
        .take_while(|d| *d < window.end)
        .map(|d| DateBucket::day(d, today))
        .collect()
}

/// Records whose inclusive span covers `date`. Records without a span are
/// skipped.
pub fn records_for_bucket<'a>(records: &'a [Record], date: NaiveDate) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| r.span().map(|s| s.contains(date)).unwrap_or(false))
        .collect()
}

/// Month view: blank cells before the 1st (Sunday-start grid), then every
/// day of the anchor's month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month_start: NaiveDate,
    pub leading_blanks: usize,
    pub days: Vec<DateBucket>,
}

pub fn month_grid(anchor: NaiveDate, today: NaiveDate) -> MonthGrid {
    let month_start = first_day_of_month(anchor);
    let count = days_in_month(month_start.year(), month_start.month()) as usize;
    MonthGrid {
        month_start,
        leading_blanks: month_start.weekday().num_days_from_sunday() as usize,
        days: month_start
            .iter_days()
            .take(count)
            .map(|d| DateBucket::day(d, today))
            .collect(),
    }
}

/// Week view: the seven days of the anchor's week.
pub fn week_days(anchor: NaiveDate, today: NaiveDate) -> Vec<DateBucket> {
    first_day_of_week(anchor)
        .iter_days()
        .take(7)
        .map(|d| DateBucket::day(d, today))
        .collect()
}

/// What a calendar cell shows: the first `limit` items and how many more
/// were cut.
#[derive(Debug, PartialEq)]
pub struct CellPreview<'a> {
    pub shown: Vec<&'a Record>,
    pub overflow: usize,
}

pub fn cell_preview<'a>(items: Vec<&'a Record>, limit: usize) -> CellPreview<'a> {
    let overflow = items.len().saturating_sub(limit);
    let shown = items.into_iter().take(limit).collect();
    CellPreview { shown, overflow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{date, task};
    use crate::status::Status;
    use pretty_assertions::assert_eq;

    fn window(start: NaiveDate, end: NaiveDate) -> TimelineWindow {
        TimelineWindow {
            anchor: start,
            start,
            end,
        }
    }

    #[test]
    fn week_starts_on_sunday() {
        assert_eq!(first_day_of_week(date(2025, 3, 20)), date(2025, 3, 16));
        assert_eq!(first_day_of_week(date(2025, 3, 16)), date(2025, 3, 16));
        assert_eq!(first_day_of_week(date(2025, 3, 1)), date(2025, 2, 23));
    }

    #[test]
    fn enumerate_days_is_half_open_and_flags_days() {
        let days = enumerate_days(
            &window(date(2025, 3, 14), date(2025, 3, 18)),
            date(2025, 3, 15),
        );
        let dates: Vec<_> = days.iter().map(|b| b.date()).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 3, 14),
                date(2025, 3, 15),
                date(2025, 3, 16),
                date(2025, 3, 17)
            ]
        );
        assert_eq!(
            days.iter().map(|b| b.is_weekend).collect::<Vec<_>>(),
            vec![false, true, true, false]
        );
        assert_eq!(days.iter().filter(|b| b.is_current).count(), 1);
        assert!(days[1].is_current);
    }

    #[test]
    fn every_covered_day_includes_the_record_once() {
        let records = vec![
            task(
                "t1",
                Some(Status::Pending),
                Some((date(2025, 2, 27), date(2025, 3, 2))),
            ),
            task("t2", Some(Status::Pending), None),
            task(
                "t3",
                Some(Status::Pending),
                Some((date(2025, 3, 2), date(2025, 3, 2))),
            ),
        ];
        let days = enumerate_days(&window(date(2025, 2, 25), date(2025, 3, 5)), date(2025, 1, 1));
        for bucket in &days {
            let hits = records_for_bucket(&records, bucket.date());
            let t1 = hits.iter().filter(|r| r.id() == "t1").count();
            let expected = usize::from(bucket.date() >= date(2025, 2, 27) && bucket.date() <= date(2025, 3, 2));
            assert_eq!(t1, expected, "t1 on {}", bucket.date());
            assert!(hits.iter().all(|r| r.id() != "t2"));
        }
        let zero_length: Vec<_> = days
            .iter()
            .filter(|b| records_for_bucket(&records, b.date()).iter().any(|r| r.id() == "t3"))
            .collect();
        assert_eq!(zero_length.len(), 1);
    }

    #[test]
    fn week_numbers_form_contiguous_runs() {
        let days = enumerate_days(&window(date(2025, 1, 1), date(2025, 3, 1)), date(2025, 1, 1));
        let numbers: Vec<u32> = days.iter().map(|b| week_number(b.date())).collect();
        assert_eq!(numbers[0], 1);
        assert!(numbers.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));
        // 2025-01-01 is a Wednesday, so Sunday the 5th opens week 2.
        assert_eq!(week_number(date(2025, 1, 4)), 1);
        assert_eq!(week_number(date(2025, 1, 5)), 2);
        assert_eq!(week_number(date(2025, 3, 20)), 12);
    }

    #[test]
    fn month_grid_pads_to_first_weekday() {
        let grid = month_grid(date(2025, 3, 20), date(2025, 3, 20));
        assert_eq!(grid.month_start, date(2025, 3, 1));
        assert_eq!(grid.leading_blanks, 6);
        assert_eq!(grid.days.len(), 31);
        assert!(grid.days[19].is_current);
        assert_eq!(month_grid(date(2024, 2, 10), date(2024, 2, 10)).days.len(), 29);
    }

    #[test]
    fn week_days_cover_sunday_to_saturday() {
        let days = week_days(date(2025, 3, 20), date(2025, 3, 20));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date(), date(2025, 3, 16));
        assert_eq!(days[6].date(), date(2025, 3, 22));
    }

    #[test]
    fn preview_counts_overflow() {
        let records: Vec<Record> = (0..5)
            .map(|i| task(&format!("t{}", i), Some(Status::Pending), None))
            .collect();
        let preview = cell_preview(records.iter().collect(), 3);
        assert_eq!(preview.shown.len(), 3);
        assert_eq!(preview.overflow, 2);
        let small = cell_preview(records.iter().take(2).collect(), 3);
        assert_eq!(small.overflow, 0);
    }
}
