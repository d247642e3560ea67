//! View-mode state for the calendar and the Gantt chart. The two machines
//! are independent; each lives as long as the surface showing it.

use crate::config::ZoomSettings;
use crate::dates::{first_day_of_month, first_day_of_week, month_grid, week_days, BucketUnit, DateBucket};
use crate::layout::{month_name, zoom, ZoomDirection};
use chrono::{Datelike, Duration, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarMode {
    #[default]
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GanttMode {
    #[default]
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub mode: CalendarMode,
    pub anchor: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttView {
    pub mode: GanttMode,
    pub pixels_per_day: u32,
    pub scroll_offset: u32,
}

impl CalendarMode {
    pub fn label(&self) -> &'static str {
        match self {
            CalendarMode::Month => "Month",
            CalendarMode::Week => "Week",
            CalendarMode::Day => "Day",
        }
    }
}

impl GanttMode {
    pub fn label(&self) -> &'static str {
        match self {
            GanttMode::Days => "Days",
            GanttMode::Weeks => "Weeks",
            GanttMode::Months => "Months",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            GanttMode::Days => GanttMode::Weeks,
            GanttMode::Weeks => GanttMode::Months,
            GanttMode::Months => GanttMode::Days,
        }
    }

    /// Header rows drawn above the bars, outermost first.
    pub fn header_rows(&self) -> &'static [BucketUnit] {
        match self {
            GanttMode::Days => &[BucketUnit::Month, BucketUnit::Day],
            GanttMode::Weeks => &[BucketUnit::Month, BucketUnit::Week],
            GanttMode::Months => &[BucketUnit::Month],
        }
    }
}

impl CalendarView {
    pub fn new(anchor: NaiveDate) -> Self {
        CalendarView {
            mode: CalendarMode::Month,
            anchor,
        }
    }

    /// Month steps land on the 1st; week and day steps keep the weekday.
    pub fn next(&mut self) {
        self.anchor = match self.mode {
            CalendarMode::Month => first_day_of_month(self.anchor)
                .checked_add_months(Months::new(1))
                .unwrap_or(self.anchor),
            CalendarMode::Week => shift(self.anchor, 7),
            CalendarMode::Day => shift(self.anchor, 1),
        };
    }

    pub fn previous(&mut self) {
        self.anchor = match self.mode {
            CalendarMode::Month => first_day_of_month(self.anchor)
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.anchor),
            CalendarMode::Week => shift(self.anchor, -7),
            CalendarMode::Day => shift(self.anchor, -1),
        };
    }

    /// Entering week mode snaps the anchor to Sunday; other modes keep it.
    pub fn set_mode(&mut self, mode: CalendarMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == CalendarMode::Week {
            self.anchor = first_day_of_week(self.anchor);
        }
    }

    pub fn title(&self) -> String {
        match self.mode {
            CalendarMode::Month => {
                format!("{} {}", month_name(self.anchor.month()), self.anchor.year())
            }
            CalendarMode::Week => {
                let start = first_day_of_week(self.anchor);
                format!(
                    "Week of {} {}, {}",
                    month_name(start.month()),
                    start.day(),
                    start.year()
                )
            }
            CalendarMode::Day => format!(
                "{} {}, {}",
                month_name(self.anchor.month()),
                self.anchor.day(),
                self.anchor.year()
            ),
        }
    }

    /// Day buckets shown by the current mode.
    pub fn visible_days(&self, today: NaiveDate) -> Vec<DateBucket> {
        match self.mode {
            CalendarMode::Month => month_grid(self.anchor, today).days,
            CalendarMode::Week => week_days(self.anchor, today),
            CalendarMode::Day => vec![DateBucket::day(self.anchor, today)],
        }
    }
}

impl GanttView {
    pub fn new(zoom: &ZoomSettings) -> Self {
        GanttView {
            mode: GanttMode::Days,
            pixels_per_day: zoom.initial.clamp(zoom.min, zoom.max),
            scroll_offset: 0,
        }
    }

    pub fn set_mode(&mut self, mode: GanttMode) {
        self.mode = mode;
    }

    /// Gantt navigation pans the viewport; it never moves the window.
    pub fn next(&mut self, step: u32) {
        self.scroll_offset = self.scroll_offset.saturating_add(step);
    }

    pub fn previous(&mut self, step: u32) {
        self.scroll_offset = self.scroll_offset.saturating_sub(step);
    }

    pub fn zoom_in(&mut self, bounds: &ZoomSettings) {
        self.pixels_per_day = zoom(self.pixels_per_day, ZoomDirection::In, bounds);
    }

    pub fn zoom_out(&mut self, bounds: &ZoomSettings) {
        self.pixels_per_day = zoom(self.pixels_per_day, ZoomDirection::Out, bounds);
    }
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::date;
    use pretty_assertions::assert_eq;

    #[test]
    fn week_mode_reanchors_and_month_keeps_it() {
        let mut view = CalendarView::new(date(2025, 3, 20));
        view.set_mode(CalendarMode::Week);
        assert_eq!(view.anchor, date(2025, 3, 16));
        view.set_mode(CalendarMode::Month);
        assert_eq!(view.anchor, date(2025, 3, 16));
        view.set_mode(CalendarMode::Day);
        assert_eq!(view.anchor, date(2025, 3, 16));
    }

    #[test]
    fn month_steps_land_on_the_first() {
        let mut view = CalendarView::new(date(2025, 1, 31));
        view.next();
        assert_eq!(view.anchor, date(2025, 2, 1));
        view.previous();
        view.previous();
        assert_eq!(view.anchor, date(2024, 12, 1));
        assert_eq!(view.title(), "December 2024");
    }

    #[test]
    fn week_and_day_steps() {
        let mut view = CalendarView::new(date(2025, 3, 20));
        view.set_mode(CalendarMode::Week);
        view.next();
        assert_eq!(view.anchor, date(2025, 3, 23));
        assert_eq!(view.title(), "Week of March 23, 2025");
        view.set_mode(CalendarMode::Day);
        view.previous();
        assert_eq!(view.anchor, date(2025, 3, 22));
        assert_eq!(view.visible_days(date(2025, 3, 22)).len(), 1);
        assert_eq!(view.title(), "March 22, 2025");
    }

    #[test]
    fn week_title_uses_the_year_of_its_sunday() {
        let view = CalendarView {
            mode: CalendarMode::Week,
            anchor: date(2025, 1, 1),
        };
        assert_eq!(view.title(), "Week of December 29, 2024");
    }

    #[test]
    fn same_mode_switch_is_ignored() {
        let mut view = CalendarView::new(date(2025, 3, 20));
        view.set_mode(CalendarMode::Month);
        assert_eq!(view, CalendarView::new(date(2025, 3, 20)));
    }

    #[test]
    fn gantt_scroll_never_goes_negative() {
        let bounds = ZoomSettings::default();
        let mut view = GanttView::new(&bounds);
        assert_eq!(view.mode, GanttMode::Days);
        assert_eq!(view.pixels_per_day, 40);
        view.next(200);
        view.previous(200);
        view.previous(200);
        assert_eq!(view.scroll_offset, 0);
        for _ in 0..10 {
            view.zoom_in(&bounds);
        }
        assert_eq!(view.pixels_per_day, 100);
        assert_eq!(view.mode.cycle().header_rows(), &[BucketUnit::Month, BucketUnit::Week]);
    }
}
