//! Flat cell sequence for a 7-column month grid.
//!
//! # Responsibility
//! - Compute leading blank cells so day 1 lands under its weekday column.
//! - Emit every day of the month in order, with no trailing padding.
//!
//! # Invariants
//! - Cell count is always `leading_blanks + days_in_month`.
//! - The first non-blank cell is day 1; the last cell is the last day.
//! - A month starting on Sunday has zero blanks; Saturday has six.
//!
//! # See also
//! - docs/architecture/data-model.md

use super::CalendarError;
use crate::model::day::CalendarDay;
use chrono::{Datelike, NaiveDate};

/// Column headers in grid order. Index 0 renders above a Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One slot of the flat month grid.
///
/// `Blank` slots pad the first week so day 1 falls under the right
/// weekday column. Rows after the last day are simply not emitted;
/// renderers stop where the sequence stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Blank,
    Day(CalendarDay),
}

/// Builds the flat cell sequence for one month.
///
/// The result starts with [`leading_blanks`] blank cells and then carries
/// every day of the month in ascending order.
pub fn generate_days(year: i32, month: u32) -> Result<Vec<GridCell>, CalendarError> {
    let blanks = leading_blanks(year, month)? as usize;
    let day_count = days_in_month(year, month)?;

    let mut cells = Vec::with_capacity(blanks + day_count as usize);
    cells.resize(blanks, GridCell::Blank);

    for day in 1..=day_count {
        let date = CalendarDay::new(year, month, day)
            .map_err(|_| CalendarError::InvalidMonth { year, month })?;
        cells.push(GridCell::Day(date));
    }

    Ok(cells)
}

/// Number of blank cells before day 1, counted from Sunday.
pub fn leading_blanks(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = first_of_month(year, month)?;
    Ok(first.weekday().num_days_from_sunday())
}

/// Number of days in the given month, leap years included.
///
/// Derived from the distance to the next month's first day, so there is
/// no leap-year table to keep in sync.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = first_of_month(year, month)?;
    let next_first = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok(next_first.signed_duration_since(first).num_days() as u32)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })
}
