//! Photo entry domain model.
//!
//! # Responsibility
//! - Define the canonical record behind one calendar cell: photo + caption.
//! - Validate the stored filename so it can never escape the photo directory.
//!
//! # Invariants
//! - At most one entry exists per [`CalendarDay`] (enforced by storage).
//! - `image_filename` is a bare file name, never a path.
//! - An entry without an image does not exist; captions ride on photos.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::day::CalendarDay;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One day's photo record as persisted in the entry index.
///
/// The image bytes themselves live on disk next to the index; the entry
/// only carries the file name so the media directory can be relocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoEntry {
    /// The day this entry belongs to. Also the storage primary key.
    pub day: CalendarDay,
    /// Bare file name of the full-size image inside the photo directory.
    pub image_filename: String,
    /// Free-form caption. Empty means "no description yet".
    pub description: String,
}

impl PhotoEntry {
    pub fn new(
        day: CalendarDay,
        image_filename: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            day,
            image_filename: image_filename.into(),
            description: description.into(),
        }
    }

    /// Checks storage-boundary invariants before the entry is persisted.
    ///
    /// Read paths run the same check so a tampered index row is rejected
    /// instead of being resolved against the filesystem.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.image_filename.is_empty() {
            return Err(EntryValidationError::EmptyFilename);
        }
        if !is_bare_filename(&self.image_filename) {
            return Err(EntryValidationError::UnsafeFilename(
                self.image_filename.clone(),
            ));
        }
        Ok(())
    }
}

/// Returns whether `name` is a plain file name with no path components.
///
/// The store joins stored names onto its photo directory, so separators
/// and dot-relative names must never reach that join.
pub fn is_bare_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Validation failures for [`PhotoEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// `image_filename` is empty.
    EmptyFilename,
    /// `image_filename` contains path separators or dot-relative parts.
    UnsafeFilename(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFilename => write!(f, "image_filename must not be empty"),
            Self::UnsafeFilename(name) => {
                write!(f, "image_filename `{name}` must be a bare file name")
            }
        }
    }
}

impl Error for EntryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day() -> CalendarDay {
        CalendarDay::new(2025, 8, 14).unwrap()
    }

    #[test]
    fn validate_accepts_bare_filename() {
        let entry = PhotoEntry::new(sample_day(), "photo-2025-08-14.png", "beach");
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_filename() {
        let entry = PhotoEntry::new(sample_day(), "", "beach");
        assert_eq!(entry.validate(), Err(EntryValidationError::EmptyFilename));
    }

    #[test]
    fn validate_rejects_path_like_filenames() {
        for bad in ["../escape.png", "a/b.png", "a\\b.png", ".", ".."] {
            let entry = PhotoEntry::new(sample_day(), bad, "");
            assert_eq!(
                entry.validate(),
                Err(EntryValidationError::UnsafeFilename(bad.to_string())),
                "expected `{bad}` to be rejected"
            );
        }
    }

    #[test]
    fn empty_description_is_allowed() {
        let entry = PhotoEntry::new(sample_day(), "photo-2025-08-14.png", "");
        assert_eq!(entry.validate(), Ok(()));
    }
}
