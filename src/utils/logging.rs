//! Logging macros gated on a per-module `ENABLE_LOGS` flag.
//!
//! Modules that want these define the flag and pull the macros from the
//! crate root:
//!
//! ```rust
//! const ENABLE_LOGS: bool = true;
//!
//! use autosend::{log_info, log_warn};
//!
//! log_info!("emitted only when ENABLE_LOGS is true");
//! ```
//!
//! Flipping the const to `false` silences a module without touching its
//! call sites, which beats sprinkling log levels per target.

/// Info-level logging, gated on the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level logging, gated on the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level logging, gated on the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
