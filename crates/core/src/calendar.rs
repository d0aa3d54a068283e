//! Scheduling view model: pure projections from a flat, (date, time)-sorted
//! lesson list into daily and weekly calendar shapes, plus the cursor used
//! for day-by-day navigation.
//!
//! The cursor always works in whole-week fetch windows: navigation returns
//! the Monday-to-Sunday window surrounding the new date so that switching
//! between daily and weekly display needs no additional fetch.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::lesson::LessonResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Daily,
    Weekly,
}

/// An inclusive date range to fetch lessons for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Orders lessons ascending by (date, time). The daily and weekly
/// projections assume their input is sorted this way.
pub fn sort_by_slot(lessons: &mut [LessonResponse]) {
    lessons.sort_by_key(|lesson| (lesson.date, lesson.time));
}

/// One day column of the weekly grid. Present even when empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub lessons: Vec<LessonResponse>,
}

/// Returns the Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - Days::new(offset)
}

/// Returns the Monday-anchored, inclusive 7-day window containing `date`.
pub fn week_window(date: NaiveDate) -> FetchWindow {
    let start = week_start(date);
    FetchWindow {
        start,
        end: start + Days::new(6),
    }
}

/// Lessons whose calendar date equals `date`. Time of day is ignored;
/// input order is preserved.
pub fn daily_projection(lessons: &[LessonResponse], date: NaiveDate) -> Vec<LessonResponse> {
    lessons
        .iter()
        .filter(|lesson| lesson.date == date)
        .cloned()
        .collect()
}

/// Buckets lessons into the 7 days of the week containing `date`.
///
/// Always yields exactly 7 buckets, Monday first, empty or not. Lessons
/// outside the window are dropped; within a bucket the caller's ordering
/// (ascending date, time from the store) is preserved.
pub fn weekly_projection(lessons: &[LessonResponse], date: NaiveDate) -> Vec<DayBucket> {
    let start = week_start(date);
    (0..7)
        .map(|i| {
            let day = start + Days::new(i);
            DayBucket {
                date: day,
                lessons: daily_projection(lessons, day),
            }
        })
        .collect()
}

/// The served shape of the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekViewResponse {
    pub window: FetchWindow,
    pub days: Vec<DayBucket>,
}

/// Navigation state for the lesson calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    pub date: NaiveDate,
    pub mode: ViewMode,
}

impl CalendarCursor {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            mode: ViewMode::Daily,
        }
    }

    /// Moves the cursor one day forward and returns the week window to
    /// (re)fetch lessons for.
    pub fn advance_day(&mut self) -> FetchWindow {
        self.date = self.date + Days::new(1);
        week_window(self.date)
    }

    /// Moves the cursor one day back and returns the week window to
    /// (re)fetch lessons for.
    pub fn retreat_day(&mut self) -> FetchWindow {
        self.date = self.date - Days::new(1);
        week_window(self.date)
    }

    /// Switches between daily and weekly display. A pure presentation
    /// toggle: the week window is unchanged, so no refetch is signalled.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// The window a fresh render at the current cursor should fetch.
    pub fn window(&self) -> FetchWindow {
        week_window(self.date)
    }
}
