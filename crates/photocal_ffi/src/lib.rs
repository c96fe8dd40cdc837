//! FFI bridge between `photocal_core` and the Flutter shell.
//!
//! # Responsibility
//! - Host the FRB-exported API surface in [`api`].
//! - Keep this layer thin; domain rules live in `photocal_core`.

pub mod api;
