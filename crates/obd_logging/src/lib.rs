#![deny(missing_docs)]
//! Shared logging utilities for the OBD console workspace.
//!
//! Every crate logs through the `obd_*` macros rather than calling `log`
//! directly, so the destination and filtering are decided in one place: the
//! console installs a `simplelog` logger at startup (file, terminal or both),
//! and tests call [`initialize_for_tests`].
//!
//! Levels are used as follows across the workspace:
//! - `error`: a step could not run at all (engine stopped, export failed).
//! - `warn`: a remote call or validation failed and the operator was told.
//! - `info`: pipeline milestones such as uploads, scrub results and launches.
//! - `debug`: dropped or ignored completions.
//! - `trace`: individual HTTP calls.
//!
//! The macros expand through this crate's re-export of `log`, so callers do
//! not need their own `log` dependency for them.

#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! obd_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! obd_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! obd_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! obd_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! obd_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
