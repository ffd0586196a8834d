//! Browser console output.
//!
//! No `tracing` subscriber is installed in the browser, so events from both
//! crates fall through to the `log` facade, which `console_log` prints with
//! the console method matching each record's level.

use log::Level;

/// Report panics on the console instead of as a bare `unreachable` trap.
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Install the console logger.
///
/// Only the first call installs it; later calls just move the level filter.
pub fn init_logging(max_level: Level) {
    match console_log::init_with_level(max_level) {
        Ok(()) => tracing::debug!(level = %max_level, "console logging ready"),
        Err(_) => log::set_max_level(max_level.to_level_filter()),
    }
}
