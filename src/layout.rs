//! Gantt geometry: the visible window, bar positions, merged header cells,
//! zoom and the "scroll to today" offset.

use crate::config::{LayoutSettings, ZoomSettings};
use crate::dates::{days_between, enumerate_days, week_number, BucketUnit};
use crate::model::Record;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

/// Active date range. `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    pub anchor: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn total_days(&self) -> i64 {
        days_between(self.start, self.end).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    pub offset: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    pub label: String,
    pub start: NaiveDate,
    pub column_span: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Fit the window to the records' spans, padded on both sides. With no
/// dated records the window falls back to a fixed range around `today`.
pub fn compute_window(
    records: &[Record],
    settings: &LayoutSettings,
    today: NaiveDate,
) -> TimelineWindow {
    let spans = records.iter().filter_map(Record::span);
    let bounds = spans.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, span| {
        Some(match acc {
            None => (span.start, span.end),
            Some((lo, hi)) => (lo.min(span.start), hi.max(span.end)),
        })
    });
    match bounds {
        Some((earliest, latest)) => TimelineWindow {
            anchor: today,
            start: shift(earliest, -settings.padding_days),
            end: shift(latest, settings.padding_days),
        },
        None => {
            debug!("no dated records, using default window around {}", today);
            TimelineWindow {
                anchor: today,
                start: shift(today, -settings.default_days_back),
                end: shift(today, settings.default_days_forward),
            }
        }
    }
}

/// Bar position for a record. Spans are end-inclusive and never shorter
/// than one day; records without a span have no bar.
pub fn bar_geometry(
    record: &Record,
    window: &TimelineWindow,
    pixels_per_day: u32,
    gutter: u32,
) -> Option<BarGeometry> {
    let span = record.span()?;
    let start_days = days_between(window.start, span.start).max(0) as u32;
    let duration = (days_between(span.start, span.end) + 1).max(1) as u32;
    Some(BarGeometry {
        offset: start_days.saturating_mul(pixels_per_day),
        length: duration
            .saturating_mul(pixels_per_day)
            .saturating_sub(gutter),
    })
}

/// Merge consecutive days of the window into month or week header cells.
/// Edge groups may be partial.
pub fn header_groups(window: &TimelineWindow, unit: BucketUnit) -> Vec<HeaderGroup> {
    let mut groups: Vec<HeaderGroup> = Vec::new();
    let mut current_key: Option<(i32, u32)> = None;
    for bucket in enumerate_days(window, window.anchor) {
        let date = bucket.date();
        let key = match unit {
            BucketUnit::Month => (date.year(), date.month()),
            BucketUnit::Week => (date.year(), week_number(date)),
            BucketUnit::Day => (date.year(), date.ordinal()),
        };
        match groups.last_mut() {
            Some(group) if current_key == Some(key) => group.column_span += 1,
            _ => {
                let label = match unit {
                    BucketUnit::Month => format!("{} {}", month_name(date.month()), date.year()),
                    BucketUnit::Week => format!("Week {}", key.1),
                    BucketUnit::Day => date.day().to_string(),
                };
                groups.push(HeaderGroup {
                    label,
                    start: date,
                    column_span: 1,
                });
                current_key = Some(key);
            }
        }
    }
    groups
}

pub fn zoom(current: u32, direction: ZoomDirection, bounds: &ZoomSettings) -> u32 {
    let next = match direction {
        ZoomDirection::In => current.saturating_add(bounds.step),
        ZoomDirection::Out => current.saturating_sub(bounds.step),
    };
    next.clamp(bounds.min, bounds.max)
}

/// Scroll offset that puts today `lead_buckets` days from the left edge.
/// Leaves `current` untouched when today is outside the window.
pub fn auto_scroll_to_today(
    window: &TimelineWindow,
    pixels_per_day: u32,
    today: NaiveDate,
    lead_buckets: u32,
    current: u32,
) -> u32 {
    if !window.contains(today) {
        return current;
    }
    let index = days_between(window.start, today) as u32;
    index
        .saturating_sub(lead_buckets)
        .saturating_mul(pixels_per_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{date, task};
    use crate::status::Status;
    use pretty_assertions::assert_eq;

    fn settings() -> LayoutSettings {
        LayoutSettings::default()
    }

    #[test]
    fn window_pads_both_ends() {
        let records = vec![
            task("a", Some(Status::Pending), Some((date(2025, 3, 1), date(2025, 3, 4)))),
            task("b", Some(Status::Pending), Some((date(2025, 3, 3), date(2025, 3, 10)))),
        ];
        let window = compute_window(&records, &settings(), date(2026, 1, 1));
        assert_eq!(window.start, date(2025, 2, 14));
        assert_eq!(window.end, date(2025, 3, 25));
    }

    #[test]
    fn undated_records_do_not_stretch_the_window() {
        let records = vec![
            task("a", Some(Status::Pending), Some((date(2025, 3, 1), date(2025, 3, 10)))),
            task("b", Some(Status::Pending), None),
        ];
        let window = compute_window(&records, &settings(), date(2030, 1, 1));
        assert_eq!(window.start, date(2025, 2, 14));
        assert_eq!(window.end, date(2025, 3, 25));
    }

    #[test]
    fn empty_input_uses_default_window() {
        let today = date(2025, 3, 20);
        let window = compute_window(&[], &settings(), today);
        assert_eq!(window.start, date(2025, 3, 5));
        assert_eq!(window.end, date(2025, 6, 3));
        let undated = vec![task("b", None, None)];
        assert_eq!(compute_window(&undated, &settings(), today), window);
    }

    #[test]
    fn single_day_bar_has_full_width() {
        let window = TimelineWindow {
            anchor: date(2025, 3, 1),
            start: date(2025, 3, 1),
            end: date(2025, 3, 31),
        };
        let record = task("a", None, Some((date(2025, 3, 1), date(2025, 3, 1))));
        let bar = bar_geometry(&record, &window, 40, 4).unwrap();
        assert_eq!(bar, BarGeometry { offset: 0, length: 36 });

        let later = task("b", None, Some((date(2025, 3, 3), date(2025, 3, 5))));
        let bar = bar_geometry(&later, &window, 40, 0).unwrap();
        assert_eq!(bar, BarGeometry { offset: 80, length: 120 });
    }

    #[test]
    fn degenerate_spans_are_clamped() {
        let window = TimelineWindow {
            anchor: date(2025, 3, 10),
            start: date(2025, 3, 10),
            end: date(2025, 3, 31),
        };
        let reversed = task("a", None, Some((date(2025, 3, 5), date(2025, 3, 1))));
        let bar = bar_geometry(&reversed, &window, 20, 4).unwrap();
        assert_eq!(bar, BarGeometry { offset: 0, length: 16 });
        assert_eq!(bar_geometry(&task("b", None, None), &window, 20, 4), None);
    }

    #[test]
    fn header_groups_merge_months_with_partial_edges() {
        let window = TimelineWindow {
            anchor: date(2025, 2, 14),
            start: date(2025, 2, 14),
            end: date(2025, 3, 25),
        };
        let groups = header_groups(&window, BucketUnit::Month);
        assert_eq!(
            groups
                .iter()
                .map(|g| (g.label.as_str(), g.column_span))
                .collect::<Vec<_>>(),
            vec![("February 2025", 15), ("March 2025", 24)]
        );
        let total: usize = header_groups(&window, BucketUnit::Week)
            .iter()
            .map(|g| g.column_span)
            .sum();
        assert_eq!(total as i64, window.total_days());
    }

    #[test]
    fn week_groups_split_on_sundays() {
        let window = TimelineWindow {
            anchor: date(2025, 3, 13),
            start: date(2025, 3, 13),
            end: date(2025, 3, 25),
        };
        let groups = header_groups(&window, BucketUnit::Week);
        assert_eq!(
            groups
                .iter()
                .map(|g| (g.label.as_str(), g.column_span))
                .collect::<Vec<_>>(),
            vec![("Week 11", 3), ("Week 12", 7), ("Week 13", 2)]
        );
    }

    #[test]
    fn zoom_is_clamped() {
        let bounds = ZoomSettings::default();
        assert_eq!(zoom(40, ZoomDirection::In, &bounds), 50);
        assert_eq!(zoom(20, ZoomDirection::Out, &bounds), 20);
        assert_eq!(zoom(100, ZoomDirection::In, &bounds), 100);
        let mut level = 100;
        for _ in 0..20 {
            level = zoom(level, ZoomDirection::Out, &bounds);
        }
        assert_eq!(level, 20);
    }

    #[test]
    fn scroll_puts_today_three_days_in() {
        let window = TimelineWindow {
            anchor: date(2025, 3, 1),
            start: date(2025, 3, 1),
            end: date(2025, 4, 1),
        };
        assert_eq!(auto_scroll_to_today(&window, 40, date(2025, 3, 11), 3, 0), 280);
        assert_eq!(auto_scroll_to_today(&window, 40, date(2025, 3, 2), 3, 99), 0);
        assert_eq!(auto_scroll_to_today(&window, 40, date(2025, 5, 1), 3, 99), 99);
    }
}
