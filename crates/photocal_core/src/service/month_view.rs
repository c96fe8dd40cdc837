//! Render model for the month screen.
//!
//! # Responsibility
//! - Join the month grid with stored entries into one display-ready value.
//! - Resolve each day to the image path its cell should render, preferring
//!   the thumbnail and falling back to the full-size file.
//!
//! # Invariants
//! - Cell order matches [`crate::calendar::grid::generate_days`] exactly.
//! - A cell is `HasPhoto` only when a readable image file backs it; a
//!   dangling index row renders as an empty day.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::calendar::cursor::MonthCursor;
use crate::calendar::grid::{generate_days, GridCell, WEEKDAY_LABELS};
use crate::calendar::CalendarError;
use crate::model::day::CalendarDay;
use crate::model::entry::PhotoEntry;
use crate::repo::entry_repo::{EntryListQuery, PhotoEntryRepository};
use crate::service::photo_store::{PhotoStore, StoreError};
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// What one day cell renders: the placeholder or a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// No photo for this day; render the empty-day placeholder.
    Empty,
    /// Render the image at `thumbnail`. Points at the thumbnail when one
    /// exists, otherwise at the full-size file.
    HasPhoto { thumbnail: PathBuf },
}

/// One slot of the rendered month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthCell {
    /// Leading padding before day 1.
    Blank,
    /// A real day with its display content.
    Day {
        day: CalendarDay,
        content: CellContent,
    },
}

/// Display-ready month screen: header title, weekday row, cell sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub title: String,
    pub weekday_labels: [&'static str; 7],
    pub cells: Vec<MonthCell>,
}

/// Failures while assembling a month view.
#[derive(Debug)]
pub enum MonthViewError {
    Calendar(CalendarError),
    Store(StoreError),
}

impl Display for MonthViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MonthViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Calendar(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<CalendarError> for MonthViewError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

impl From<StoreError> for MonthViewError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Pure mapping from a day and its resolved image to a grid cell.
pub fn day_cell(day: CalendarDay, image: Option<PathBuf>) -> MonthCell {
    let content = match image {
        Some(thumbnail) => CellContent::HasPhoto { thumbnail },
        None => CellContent::Empty,
    };
    MonthCell::Day { day, content }
}

/// Assembles the month screen for one year/month pair.
///
/// Storage is consulted once for the whole month; per-cell work is pure.
pub fn build_month_view<R: PhotoEntryRepository>(
    store: &PhotoStore<R>,
    year: i32,
    month: u32,
) -> Result<MonthView, MonthViewError> {
    let cursor = MonthCursor::new(year, month)?;
    let grid = generate_days(year, month)?;

    let entries = store.list_entries(&EntryListQuery::for_month(year, month))?;
    let by_day: BTreeMap<CalendarDay, PhotoEntry> = entries
        .into_iter()
        .map(|entry| (entry.day, entry))
        .collect();

    let cells = grid
        .into_iter()
        .map(|cell| match cell {
            GridCell::Blank => MonthCell::Blank,
            GridCell::Day(day) => {
                let image = by_day
                    .get(&day)
                    .and_then(|entry| resolve_cell_image(store, entry));
                day_cell(day, image)
            }
        })
        .collect();

    Ok(MonthView {
        title: cursor.title(),
        weekday_labels: WEEKDAY_LABELS,
        cells,
    })
}

/// Picks the path a cell should render, or `None` when nothing readable
/// backs the entry.
fn resolve_cell_image<R: PhotoEntryRepository>(
    store: &PhotoStore<R>,
    entry: &PhotoEntry,
) -> Option<PathBuf> {
    if let Some(thumbnail) = store.thumbnail_path(entry.day) {
        return Some(thumbnail);
    }

    match store.image_path(&entry.image_filename) {
        Ok(path) if path.is_file() => Some(path),
        Ok(path) => {
            warn!(
                "event=month_view module=view status=soft_fail day={} path={} error_code=image_file_missing",
                entry.day,
                path.display()
            );
            None
        }
        // Repository reads validate filenames, so this arm is never hit
        // for rows that came through the repo.
        Err(_) => None,
    }
}
