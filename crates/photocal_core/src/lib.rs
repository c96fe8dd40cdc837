//! Core domain logic for PhotoCal.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::cursor::{
    month_name, MonthCursor, PICKER_YEAR_MAX, PICKER_YEAR_MIN,
};
pub use calendar::grid::{
    days_in_month, generate_days, leading_blanks, GridCell, WEEKDAY_LABELS,
};
pub use calendar::CalendarError;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::day::{CalendarDay, DayError};
pub use model::entry::{is_bare_filename, EntryValidationError, PhotoEntry};
pub use repo::entry_repo::{
    normalize_entry_limit, EntryListQuery, PhotoEntryRepository, RepoError, RepoResult,
    SqlitePhotoEntryRepository,
};
pub use service::day_detail::{build_day_detail, detail_mode, DayDetail, DetailMode};
pub use service::month_view::{
    build_month_view, day_cell, CellContent, MonthCell, MonthView, MonthViewError,
};
pub use service::photo_store::{
    photo_filename, thumbnail_filename, PhotoStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
