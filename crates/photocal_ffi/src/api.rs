//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for early-stage UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures come back inside response envelopes, never as exceptions.
//!
//! # See also
//! - docs/architecture/logging.md

use log::{info, warn};
use photocal_core::db::open_db;
use photocal_core::{
    build_day_detail, build_month_view, core_version as core_version_inner,
    init_logging as init_logging_inner, ping as ping_inner, CalendarDay, CellContent, DetailMode,
    MonthCell, MonthCursor, PhotoStore, PICKER_YEAR_MAX, PICKER_YEAR_MIN,
    SqlitePhotoEntryRepository,
};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::OnceLock;

const DATA_DIR_NAME: &str = "photocal_data";
const DB_FILE_NAME: &str = "photocal.sqlite3";
static STORE_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the data directory the photo store lives in.
///
/// Input semantics:
/// - `data_dir`: absolute directory that holds the SQLite index, the photo
///   files and the thumbnails. The app shell passes its documents directory.
///
/// # FFI contract
/// - Sync call; resolves the directory once per process.
/// - Safe to call repeatedly with the same directory (idempotent).
/// - Reconfiguration attempts with a different directory return an error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(data_dir: String) -> String {
    let trimmed = data_dir.trim();
    if trimmed.is_empty() {
        return "data_dir cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    if !requested.is_absolute() {
        return format!("data_dir must be an absolute path, got `{trimmed}`");
    }

    let active = STORE_DATA_DIR.get_or_init(|| requested.clone());
    if *active == requested {
        info!(
            "event=store_configure module=ffi status=ok data_dir={}",
            active.display()
        );
        String::new()
    } else {
        warn!(
            "event=store_configure module=ffi status=error error_code=data_dir_conflict active={} requested={}",
            active.display(),
            requested.display()
        );
        format!(
            "photo store already resolved at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Plain year/month/day triple for Dart-side calendar state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRef {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Inclusive year window offered by the month/year picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerYearRange {
    /// First selectable year.
    pub min_year: i32,
    /// Last selectable year.
    pub max_year: i32,
}

/// Month navigation response for header arrows and picker jumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthShiftResponse {
    /// Whether the shift was applied.
    pub ok: bool,
    /// Resulting year (input year when `ok` is false).
    pub year: i32,
    /// Resulting month (input month when `ok` is false).
    pub month: u32,
    /// Header title for the resulting month, empty on failure.
    pub title: String,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// One cell of the month grid as the UI renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCellView {
    /// Day-of-month number, `None` for leading blank cells.
    pub day: Option<u32>,
    /// Full `YYYY-MM-DD` key for tap navigation, `None` for blanks.
    pub date: Option<String>,
    /// Whether a stored photo backs this day.
    pub has_photo: bool,
    /// Image path to render, thumbnail preferred over the full-size file.
    pub thumbnail_path: Option<String>,
}

/// Month screen response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGridResponse {
    /// Whether the grid was assembled.
    pub ok: bool,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Header title, e.g. `August 2026`.
    pub title: String,
    /// Weekday header labels, Sunday first.
    pub weekday_labels: Vec<String>,
    /// Grid cells in render order, leading blanks included.
    pub cells: Vec<GridCellView>,
}

/// Day detail screen response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDetailResponse {
    /// Whether the detail was assembled.
    pub ok: bool,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Header title, e.g. `August 14, 2026`.
    pub title: String,
    /// Stored caption, empty for days without an entry.
    pub description: String,
    /// Full-size image path, `None` when absent or unreadable.
    pub image_path: Option<String>,
    /// Whether the screen opens in edit mode (true for empty days).
    pub edit_mode: bool,
}

impl DayDetailResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            title: String::new(),
            description: String::new(),
            image_path: None,
            edit_mode: false,
        }
    }
}

/// Generic action response envelope for save commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Stored image file name on success.
    pub image_filename: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl DayActionResponse {
    fn success(message: impl Into<String>, image_filename: String) -> Self {
        Self {
            ok: true,
            image_filename: Some(image_filename),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            image_filename: None,
            message: message.into(),
        }
    }
}

/// Returns today's date in the device-local timezone.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn today_day() -> DayRef {
    let today = CalendarDay::today();
    DayRef {
        year: today.year(),
        month: today.month(),
        day: today.day(),
    }
}

/// Returns the inclusive year window the month/year picker offers.
///
/// # FFI contract
/// - Sync call, non-blocking, constant result.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn picker_year_range() -> PickerYearRange {
    PickerYearRange {
        min_year: PICKER_YEAR_MIN,
        max_year: PICKER_YEAR_MAX,
    }
}

/// Steps the visible month by `delta` months in either direction.
///
/// # FFI contract
/// - Sync call, non-blocking, pure month arithmetic.
/// - Never panics.
/// - Returns the input position unchanged when `month` is invalid.
#[flutter_rust_bridge::frb(sync)]
pub fn shift_month(year: i32, month: u32, delta: i32) -> MonthShiftResponse {
    match MonthCursor::new(year, month) {
        Ok(cursor) => {
            let shifted = cursor.shifted(delta);
            MonthShiftResponse {
                ok: true,
                year: shifted.year(),
                month: shifted.month(),
                title: shifted.title(),
                message: String::new(),
            }
        }
        Err(err) => MonthShiftResponse {
            ok: false,
            year,
            month,
            title: String::new(),
            message: format!("shift_month failed: {err}"),
        },
    }
}

/// Assembles the month screen: header title, weekday row and day cells.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Cells arrive in render order with leading blanks included.
#[flutter_rust_bridge::frb(sync)]
pub fn month_grid(year: i32, month: u32) -> MonthGridResponse {
    match with_store(|store| build_month_view(store, year, month)) {
        Ok(view) => MonthGridResponse {
            ok: true,
            message: String::new(),
            title: view.title,
            weekday_labels: view
                .weekday_labels
                .iter()
                .map(|label| (*label).to_string())
                .collect(),
            cells: view.cells.iter().map(to_grid_cell_view).collect(),
        },
        Err(message) => MonthGridResponse {
            ok: false,
            message: format!("month_grid failed: {message}"),
            title: String::new(),
            weekday_labels: Vec::new(),
            cells: Vec::new(),
        },
    }
}

/// Resolves one day into the state the detail screen opens in.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Empty days come back `ok` with `edit_mode=true`, not as failures.
#[flutter_rust_bridge::frb(sync)]
pub fn day_detail(year: i32, month: u32, day: u32) -> DayDetailResponse {
    let day = match CalendarDay::new(year, month, day) {
        Ok(day) => day,
        Err(err) => return DayDetailResponse::failure(format!("day_detail failed: {err}")),
    };

    match with_store(|store| build_day_detail(store, day)) {
        Ok(detail) => DayDetailResponse {
            ok: true,
            message: String::new(),
            title: detail.title,
            description: detail.description,
            image_path: detail.image_path.map(path_string),
            edit_mode: matches!(detail.mode, DetailMode::Edit),
        },
        Err(message) => DayDetailResponse::failure(format!("day_detail failed: {message}")),
    }
}

/// Saves a picked photo and caption for one day, replacing any previous one.
///
/// Input semantics:
/// - `image_bytes`: encoded image as handed over by the camera or gallery
///   picker (any format the codec stack decodes); stored as PNG.
///
/// # FFI contract
/// - Sync call, DB- and filesystem-backed execution.
/// - Never panics.
/// - Returns the stored image file name on success.
#[flutter_rust_bridge::frb(sync)]
pub fn save_day_photo(
    year: i32,
    month: u32,
    day: u32,
    image_bytes: Vec<u8>,
    description: String,
) -> DayActionResponse {
    let day = match CalendarDay::new(year, month, day) {
        Ok(day) => day,
        Err(err) => return DayActionResponse::failure(format!("save_day_photo failed: {err}")),
    };

    match with_store(|store| store.save_photo_bytes(&image_bytes, day, description.trim())) {
        Ok(entry) => DayActionResponse::success("Photo saved.", entry.image_filename),
        Err(message) => DayActionResponse::failure(format!("save_day_photo failed: {message}")),
    }
}

/// Rewrites only the caption of an existing photo entry.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Fails when the day has no photo; captions never exist without one.
#[flutter_rust_bridge::frb(sync)]
pub fn save_day_description(
    year: i32,
    month: u32,
    day: u32,
    description: String,
) -> DayActionResponse {
    let day = match CalendarDay::new(year, month, day) {
        Ok(day) => day,
        Err(err) => {
            return DayActionResponse::failure(format!("save_day_description failed: {err}"))
        }
    };

    match with_store(|store| store.save_description(day, description.trim())) {
        Ok(entry) => DayActionResponse::success("Description saved.", entry.image_filename),
        Err(message) => {
            DayActionResponse::failure(format!("save_day_description failed: {message}"))
        }
    }
}

fn resolve_data_dir() -> PathBuf {
    STORE_DATA_DIR
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PHOTOCAL_DATA_DIR") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DATA_DIR_NAME)
        })
        .clone()
}

fn with_store<T, E: Display>(
    f: impl FnOnce(&PhotoStore<SqlitePhotoEntryRepository<'_>>) -> Result<T, E>,
) -> Result<T, String> {
    let data_dir = resolve_data_dir();
    let conn = open_db(data_dir.join(DB_FILE_NAME))
        .map_err(|err| format!("photo DB open failed: {err}"))?;
    let repo = SqlitePhotoEntryRepository::try_new(&conn)
        .map_err(|err| format!("photo repo init failed: {err}"))?;
    let store =
        PhotoStore::new(repo, data_dir).map_err(|err| format!("photo store init failed: {err}"))?;
    f(&store).map_err(|err| err.to_string())
}

fn to_grid_cell_view(cell: &MonthCell) -> GridCellView {
    match cell {
        MonthCell::Blank => GridCellView {
            day: None,
            date: None,
            has_photo: false,
            thumbnail_path: None,
        },
        MonthCell::Day { day, content } => {
            let thumbnail_path = match content {
                CellContent::Empty => None,
                CellContent::HasPhoto { thumbnail } => Some(path_string(thumbnail.clone())),
            };
            GridCellView {
                day: Some(day.day()),
                date: Some(day.to_string()),
                has_photo: thumbnail_path.is_some(),
                thumbnail_path,
            }
        }
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
