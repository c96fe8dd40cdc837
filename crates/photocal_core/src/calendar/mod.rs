//! Month-grid arithmetic and month navigation.
//!
//! # Responsibility
//! - Turn a year/month pair into the flat cell sequence a 7-column grid renders.
//! - Provide month stepping and picker bounds for navigation chrome.
//!
//! # Invariants
//! - Weeks start on Sunday; offsets are counted from Sunday everywhere.
//! - Grid math is pure: no storage access, no clock access except `today`.
//!
//! # See also
//! - docs/architecture/data-model.md

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cursor;
pub mod grid;

/// Failures for month-level calendar operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    /// The year/month pair has no first day. Months outside 1..=12 land
    /// here, as do years beyond what `chrono` can represent.
    InvalidMonth { year: i32, month: u32 },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => {
                write!(f, "no calendar month for year {year}, month {month}")
            }
        }
    }
}

impl Error for CalendarError {}
