//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `photocal_core` linkage.
//! - Keep output cheap to eyeball for quick local sanity checks.

use photocal_core::MonthCursor;

fn main() {
    // Exercises core wiring without the Flutter/FFI runtime.
    println!("photocal_core ping={}", photocal_core::ping());
    println!("photocal_core version={}", photocal_core::core_version());

    let cursor = MonthCursor::today();
    match photocal_core::generate_days(cursor.year(), cursor.month()) {
        Ok(cells) => println!(
            "photocal_core month=\"{}\" cells={}",
            cursor.title(),
            cells.len()
        ),
        Err(err) => println!("photocal_core month_error={err}"),
    }
}
