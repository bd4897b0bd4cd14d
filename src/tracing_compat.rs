//! Tracing compatibility layer.
//!
//! - **With `tracing-integration`** (default): re-exports the `tracing`
//!   macros used by the queues.
//! - **Without it**: the same macros expand to nothing.
//!
//! ```rust,ignore
//! use crate::tracing_compat::{debug, trace};
//!
//! debug!(stream_id, removed, "stream entries cancelled");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing-integration"))]
mod noop {
    //! No-op logging macros.

    /// No-op trace-level logging macro.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug-level logging macro.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op warn-level logging macro.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    pub use crate::{debug, trace, warn};
}

#[cfg(not(feature = "tracing-integration"))]
pub use noop::*;
