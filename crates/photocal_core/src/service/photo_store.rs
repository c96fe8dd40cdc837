//! Per-day photo store: image files on disk, entry index in SQLite.
//!
//! # Responsibility
//! - Own the save path: encode the photo, refresh its thumbnail, upsert the
//!   index row, drop any stale file left by a previous save of the same day.
//! - Own the read path: resolve a day to its entry, image or thumbnail.
//!
//! # Invariants
//! - Full-size images are stored as PNG so a saved photo reads back
//!   pixel-identical; thumbnails are JPEG and purely derived data.
//! - File names are derived from the day, so re-saving a day overwrites
//!   its files instead of accumulating new ones.
//! - Read failures degrade to "no photo" and are logged; write failures
//!   surface as errors.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::day::CalendarDay;
use crate::model::entry::{is_bare_filename, PhotoEntry};
use crate::repo::entry_repo::{EntryListQuery, PhotoEntryRepository, RepoError};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Directory under the media root holding full-size images.
pub const PHOTO_DIR_NAME: &str = "photos";
/// Directory under the media root holding derived thumbnails.
pub const THUMB_DIR_NAME: &str = "thumbs";

/// Longest edge of a generated thumbnail, in pixels.
const THUMBNAIL_MAX_EDGE: u32 = 256;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for photo save/load use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Caption update targeted a day with no photo.
    EntryNotFound(CalendarDay),
    /// A caller-provided filename was not a bare file name.
    InvalidFilename(String),
    /// Incoming photo bytes were not a decodable image.
    ImageDecode(image::ImageError),
    /// The photo or thumbnail could not be written.
    ImageEncode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Filesystem failure outside image codecs.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Internal consistency mismatch between write and read-back.
    Inconsistent(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::EntryNotFound(day) => write!(f, "no photo entry for day {day}"),
            Self::InvalidFilename(name) => write!(f, "unsafe image filename `{name}`"),
            Self::ImageDecode(err) => write!(f, "image bytes could not be decoded: {err}"),
            Self::ImageEncode { path, source } => {
                write!(f, "failed to write image `{}`: {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "filesystem failure at `{}`: {source}", path.display())
            }
            Self::Inconsistent(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::ImageDecode(err) => Some(err),
            Self::ImageEncode { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(day) => Self::EntryNotFound(day),
            other => Self::Repo(other),
        }
    }
}

/// Deterministic full-size file name for a day, e.g. `photo-2026-08-14.png`.
pub fn photo_filename(day: CalendarDay) -> String {
    format!("photo-{day}.png")
}

/// Deterministic thumbnail file name for a day, e.g. `thumb-2026-08-14.jpg`.
pub fn thumbnail_filename(day: CalendarDay) -> String {
    format!("thumb-{day}.jpg")
}

/// Photo store facade over a repository implementation and a media root.
pub struct PhotoStore<R: PhotoEntryRepository> {
    repo: R,
    media_root: PathBuf,
}

impl<R: PhotoEntryRepository> PhotoStore<R> {
    /// Creates a store rooted at `media_root`, creating the photo and
    /// thumbnail directories if needed.
    pub fn new(repo: R, media_root: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self {
            repo,
            media_root: media_root.into(),
        };
        for dir in [store.photo_dir(), store.thumb_dir()] {
            fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(store)
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn photo_dir(&self) -> PathBuf {
        self.media_root.join(PHOTO_DIR_NAME)
    }

    pub fn thumb_dir(&self) -> PathBuf {
        self.media_root.join(THUMB_DIR_NAME)
    }

    /// Gets the entry for one day, `None` when the day has no photo.
    pub fn get_entry(&self, day: CalendarDay) -> StoreResult<Option<PhotoEntry>> {
        Ok(self.repo.get_entry(day)?)
    }

    /// Lists entries ordered by day ascending.
    pub fn list_entries(&self, query: &EntryListQuery) -> StoreResult<Vec<PhotoEntry>> {
        Ok(self.repo.list_entries(query)?)
    }

    /// Loads the full-size image for one day.
    ///
    /// Degrades to `None` on every failure: missing entry, missing file,
    /// unreadable bytes, even index lookup errors. Callers render the
    /// empty-day state; diagnostics go to the log.
    pub fn get_image(&self, day: CalendarDay) -> Option<DynamicImage> {
        match self.repo.get_entry(day) {
            Ok(Some(entry)) => self.load_image(&entry.image_filename),
            Ok(None) => None,
            Err(err) => {
                warn!(
                    "event=image_load module=store status=soft_fail day={day} error_code=entry_lookup_failed error={err}"
                );
                None
            }
        }
    }

    /// Loads an image by its bare file name inside the photo directory.
    ///
    /// Same soft-failure contract as [`PhotoStore::get_image`].
    pub fn load_image(&self, filename: &str) -> Option<DynamicImage> {
        if !is_bare_filename(filename) {
            warn!(
                "event=image_load module=store status=soft_fail error_code=unsafe_filename filename={filename}"
            );
            return None;
        }

        let path = self.photo_dir().join(filename);
        match image::open(&path) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(
                    "event=image_load module=store status=soft_fail path={} error_code=image_unreadable error={err}",
                    path.display()
                );
                None
            }
        }
    }

    /// Absolute path of a stored image, after checking the name is bare.
    pub fn image_path(&self, filename: &str) -> StoreResult<PathBuf> {
        if !is_bare_filename(filename) {
            return Err(StoreError::InvalidFilename(filename.to_string()));
        }
        Ok(self.photo_dir().join(filename))
    }

    /// Path of the day's thumbnail, `None` when none was generated.
    pub fn thumbnail_path(&self, day: CalendarDay) -> Option<PathBuf> {
        let path = self.thumb_dir().join(thumbnail_filename(day));
        path.is_file().then_some(path)
    }

    /// Saves a photo and caption for one day, replacing any previous entry.
    ///
    /// # Side effects
    /// - Writes the PNG, refreshes the thumbnail, upserts the index row.
    /// - Removes the previous image file when its name differs.
    /// - Emits `photo_save` logging events with duration and status.
    pub fn save_photo(
        &self,
        image: &DynamicImage,
        day: CalendarDay,
        description: &str,
    ) -> StoreResult<PhotoEntry> {
        let started_at = Instant::now();
        info!("event=photo_save module=store status=start day={day}");

        match self.save_photo_inner(image, day, description) {
            Ok(entry) => {
                info!(
                    "event=photo_save module=store status=ok day={day} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(entry)
            }
            Err(err) => {
                error!(
                    "event=photo_save module=store status=error day={day} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Decodes raw image bytes (camera/picker output) and saves them.
    pub fn save_photo_bytes(
        &self,
        bytes: &[u8],
        day: CalendarDay,
        description: &str,
    ) -> StoreResult<PhotoEntry> {
        let image = image::load_from_memory(bytes).map_err(StoreError::ImageDecode)?;
        self.save_photo(&image, day, description)
    }

    /// Rewrites only the caption of an existing entry.
    ///
    /// Fails with [`StoreError::EntryNotFound`] when the day has no photo;
    /// captions never exist without an image.
    pub fn save_description(
        &self,
        day: CalendarDay,
        description: &str,
    ) -> StoreResult<PhotoEntry> {
        self.repo.update_description(day, description)?;
        self.repo
            .get_entry(day)?
            .ok_or(StoreError::Inconsistent("entry missing after caption update"))
    }

    fn save_photo_inner(
        &self,
        image: &DynamicImage,
        day: CalendarDay,
        description: &str,
    ) -> StoreResult<PhotoEntry> {
        let previous = self.repo.get_entry(day)?;

        let filename = photo_filename(day);
        let photo_path = self.photo_dir().join(&filename);
        image
            .save_with_format(&photo_path, ImageFormat::Png)
            .map_err(|source| StoreError::ImageEncode {
                path: photo_path.clone(),
                source,
            })?;
        self.write_thumbnail(image, day);

        let entry = PhotoEntry::new(day, filename.clone(), description);
        self.repo.upsert_entry(&entry)?;

        if let Some(previous) = previous.as_ref() {
            self.remove_stale_photo(previous, filename.as_str());
        }

        self.repo
            .get_entry(day)?
            .ok_or(StoreError::Inconsistent("saved entry missing on read-back"))
    }

    /// Writes the day's thumbnail. Failure is tolerated: thumbnails are a
    /// derived cache and the grid falls back to the full-size image.
    fn write_thumbnail(&self, image: &DynamicImage, day: CalendarDay) {
        let path = self.thumb_dir().join(thumbnail_filename(day));
        let scaled = if image.width() > THUMBNAIL_MAX_EDGE || image.height() > THUMBNAIL_MAX_EDGE {
            image.resize(THUMBNAIL_MAX_EDGE, THUMBNAIL_MAX_EDGE, FilterType::Lanczos3)
        } else {
            image.clone()
        };

        // JPEG carries no alpha channel.
        let flattened = DynamicImage::ImageRgb8(scaled.to_rgb8());
        if let Err(err) = flattened.save_with_format(&path, ImageFormat::Jpeg) {
            warn!(
                "event=thumbnail_write module=store status=soft_fail day={day} path={} error={err}",
                path.display()
            );
        }
    }

    /// Removes the file a replaced entry pointed at, when its name differs
    /// from the one just written. Best effort: the index row already moved
    /// on, a leftover file only wastes space.
    fn remove_stale_photo(&self, previous: &PhotoEntry, current_filename: &str) {
        if previous.image_filename == current_filename {
            return;
        }

        // The previous filename passed validation on read, so this join
        // stays inside the photo directory.
        let path = self.photo_dir().join(&previous.image_filename);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(
                    "event=stale_photo_cleanup module=store status=ok day={} path={}",
                    previous.day,
                    path.display()
                );
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(
                    "event=stale_photo_cleanup module=store status=soft_fail day={} path={} error={err}",
                    previous.day,
                    path.display()
                );
            }
        }
    }
}
