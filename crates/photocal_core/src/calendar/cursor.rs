//! Month navigation state for the calendar header.
//!
//! # Responsibility
//! - Step the visible month forward/backward across year boundaries.
//! - Provide the header title and the year range the month picker offers.
//!
//! # Invariants
//! - A `MonthCursor` always holds a month in 1..=12.
//! - Stepping by +1 from December lands on January of the next year, and
//!   mirrored for -1 from January.
//!
//! # See also
//! - docs/architecture/data-model.md

use super::CalendarError;
use crate::model::day::CalendarDay;
use chrono::{Datelike, Local};

/// First year offered by the month/year picker.
pub const PICKER_YEAR_MIN: i32 = 1980;
/// Last year offered by the month/year picker.
pub const PICKER_YEAR_MAX: i32 = 2080;

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

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
}

/// The month currently shown by the calendar screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Builds a cursor, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(CalendarError::InvalidMonth { year, month })
        }
    }

    /// Cursor on the current month in the device-local timezone.
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month, rolling December into the next January.
    pub fn next(self) -> Self {
        self.shifted(1)
    }

    /// The preceding month, rolling January into the previous December.
    pub fn prev(self) -> Self {
        self.shifted(-1)
    }

    /// Steps the cursor by `delta` months in either direction.
    pub fn shifted(self, delta: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// Header title, e.g. `August 2026`.
    pub fn title(&self) -> String {
        match month_name(self.month) {
            Some(name) => format!("{name} {}", self.year),
            None => format!("{:02} {}", self.month, self.year),
        }
    }
}

impl From<CalendarDay> for MonthCursor {
    /// Cursor on the month containing `day`.
    fn from(day: CalendarDay) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }
}
