//! Crate to abstract out tracing so disabled levels never show up in builds, using macros.
//! See similar: <https://doc.rust-lang.org/src/std/macros.rs.html#138-145>.
//!
//! The level switches are resolved against this crate's features, so callers
//! only pick `standard` or `debug_trace` on their `trellis_trace` dependency.

#[doc(hidden)]
pub use tracing;

#[doc(hidden)]
pub const LOG_INFO: bool = cfg!(feature = "log_info");

#[doc(hidden)]
pub const LOG_WARNINGS: bool = cfg!(feature = "log_warnings");

#[doc(hidden)]
pub const LOG_ERRORS: bool = cfg!(feature = "log_errors");

#[doc(hidden)]
pub const LOG_DEBUG: bool = cfg!(feature = "log_debug");

#[doc(hidden)]
pub const LOG_VERBOSE: bool = cfg!(feature = "log_verbose");

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        if $crate::LOG_INFO {
            $crate::tracing::info!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        if $crate::LOG_WARNINGS {
            $crate::tracing::warn!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        if $crate::LOG_DEBUG {
            $crate::tracing::debug!($($t)*);
        }
    };
}

/// `verbose` carries per-request pipeline detail (parsed url, query, headers),
/// emitted at the `TRACE` level.
#[macro_export]
macro_rules! verbose {
    ($($t:tt)*) => {
        if $crate::LOG_VERBOSE {
            $crate::tracing::trace!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        if $crate::LOG_ERRORS {
            $crate::tracing::error!($($t)*);
        }
    };
}
