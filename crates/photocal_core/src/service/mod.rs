//! Core use-case services and render models.
//!
//! # Responsibility
//! - Orchestrate repository and filesystem calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod day_detail;
pub mod month_view;
pub mod photo_store;
