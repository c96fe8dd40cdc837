//! Render model for the single-day detail screen.
//!
//! # Responsibility
//! - Resolve one day into the state the detail screen opens in: viewing an
//!   existing photo or editing an empty day.
//!
//! # Invariants
//! - A day with an entry opens in `View` mode, a day without one in `Edit`.
//! - A missing or unreadable image file never fails the build; the screen
//!   still opens with the caption and a placeholder.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::calendar::cursor::month_name;
use crate::model::day::CalendarDay;
use crate::model::entry::PhotoEntry;
use crate::repo::entry_repo::PhotoEntryRepository;
use crate::service::photo_store::{PhotoStore, StoreResult};
use std::path::PathBuf;

/// Which state the detail screen opens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    /// The day has a photo; show it read-only until the user taps edit.
    View,
    /// The day is empty; open straight into photo-pick-and-describe.
    Edit,
}

/// Display-ready detail screen for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDetail {
    pub day: CalendarDay,
    /// Header title, e.g. `August 14, 2026`.
    pub title: String,
    /// Stored caption, empty for days without an entry.
    pub description: String,
    /// Full-size image path, `None` when absent or unreadable.
    pub image_path: Option<PathBuf>,
    pub mode: DetailMode,
}

/// Pure mapping from entry presence to the opening mode.
pub fn detail_mode(entry: Option<&PhotoEntry>) -> DetailMode {
    if entry.is_some() {
        DetailMode::View
    } else {
        DetailMode::Edit
    }
}

/// Header title for the detail screen.
pub fn detail_title(day: CalendarDay) -> String {
    match month_name(day.month()) {
        Some(name) => format!("{name} {}, {}", day.day(), day.year()),
        None => day.to_string(),
    }
}

/// Assembles the detail screen for one day.
pub fn build_day_detail<R: PhotoEntryRepository>(
    store: &PhotoStore<R>,
    day: CalendarDay,
) -> StoreResult<DayDetail> {
    let entry = store.get_entry(day)?;
    let mode = detail_mode(entry.as_ref());

    let (description, image_path) = match entry.as_ref() {
        Some(entry) => {
            let path = store
                .image_path(&entry.image_filename)
                .ok()
                .filter(|path| path.is_file());
            (entry.description.clone(), path)
        }
        None => (String::new(), None),
    };

    Ok(DayDetail {
        day,
        title: detail_title(day),
        description,
        image_path,
        mode,
    })
}
