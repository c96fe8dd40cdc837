//! Domain model for the per-day photo journal.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one day-keyed shape shared by the grid, the detail view and storage.
//!
//! # Invariants
//! - Every record is identified by its [`day::CalendarDay`], never by a surrogate id.
//! - Saving over an existing day replaces the previous record.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod day;
pub mod entry;
