//! Calendar day domain model.
//!
//! # Responsibility
//! - Define the per-day key every photo entry hangs off.
//! - Own the canonical `YYYY-MM-DD` text form used by storage and filenames.
//!
//! # Invariants
//! - A constructed `CalendarDay` always names a real calendar date.
//! - The text form is stable: format then parse yields the same value.
//! - Ordering is chronological (year, then month, then day).
//!
//! # See also
//! - docs/architecture/data-model.md

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One concrete day in the proleptic Gregorian calendar.
///
/// Fields stay private so the "always a real date" invariant cannot be
/// bypassed with a struct literal. Construction goes through [`CalendarDay::new`],
/// parsing, or conversion from a [`NaiveDate`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "DayParts")]
pub struct CalendarDay {
    year: i32,
    month: u32,
    day: u32,
}

/// Raw wire shape for [`CalendarDay`] deserialization.
///
/// Deserializing goes through [`CalendarDay::new`], so invalid dates are
/// rejected at the boundary instead of leaking into domain code.
#[derive(Deserialize)]
struct DayParts {
    year: i32,
    month: u32,
    day: u32,
}

impl TryFrom<DayParts> for CalendarDay {
    type Error = DayError;

    fn try_from(parts: DayParts) -> Result<Self, Self::Error> {
        Self::new(parts.year, parts.month, parts.day)
    }
}

impl CalendarDay {
    /// Builds a day after checking it exists in the calendar.
    ///
    /// Rejects month 0/13, day 0, Feb 29 on non-leap years, and anything
    /// else `chrono` cannot place on a real date.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DayError> {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(_) => Ok(Self { year, month, day }),
            None => Err(DayError::OutOfRange { year, month, day }),
        }
    }

    /// Today's date in the device-local timezone.
    pub fn today() -> Self {
        Self::from(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Converts back to `chrono` for date arithmetic.
    pub fn to_naive(self) -> NaiveDate {
        // Construction already proved the triple valid, so this cannot miss;
        // fall back to the epoch instead of panicking if it ever does.
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap_or_default()
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl Display for CalendarDay {
    /// Canonical `YYYY-MM-DD` form used as the storage key.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDay {
    type Err = DayError;

    /// Parses the canonical `YYYY-MM-DD` form.
    ///
    /// Splits from the right so a negative year keeps its sign.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, '-');
        let day_text = parts.next();
        let month_text = parts.next();
        let year_text = parts.next();

        let (year_text, month_text, day_text) = match (year_text, month_text, day_text) {
            (Some(y), Some(m), Some(d)) if !y.is_empty() => (y, m, d),
            _ => return Err(DayError::Malformed(s.to_string())),
        };

        let year = year_text
            .parse::<i32>()
            .map_err(|_| DayError::Malformed(s.to_string()))?;
        let month = month_text
            .parse::<u32>()
            .map_err(|_| DayError::Malformed(s.to_string()))?;
        let day = day_text
            .parse::<u32>()
            .map_err(|_| DayError::Malformed(s.to_string()))?;

        Self::new(year, month, day)
    }
}

/// Construction/parse failures for [`CalendarDay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayError {
    /// The year/month/day triple names no real calendar date.
    OutOfRange { year: i32, month: u32, day: u32 },
    /// The text form is not `YYYY-MM-DD`.
    Malformed(String),
}

impl Display for DayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { year, month, day } => {
                write!(f, "no such calendar day: year {year}, month {month}, day {day}")
            }
            Self::Malformed(text) => {
                write!(f, "malformed calendar day `{text}`, expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for DayError {}
