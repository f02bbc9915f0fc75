#![forbid(unsafe_code)]

//! Logging helpers.
//!
//! The bridge logs through `tracing`. Callback boundaries never propagate
//! errors, so the log is the only place where dropped frames, no-op edit
//! commands, and injections into a closed session show up.
//!
//! Target names used across the workspace:
//!
//! | Target | Emitted by |
//! |--------|------------|
//! | `osr::input` | key/mouse routing, IME transitions |
//! | `osr::frame` | paint callbacks, popup state |
//! | `osr::session` | lifecycle, edit dispatch, context menu |

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a JSON subscriber writing to stdout.
///
/// `filter` uses `EnvFilter` syntax (`"osr=debug,info"`). Fails if the filter
/// does not parse or a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = tracing_subscriber::EnvFilter::try_new(filter)?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
}
