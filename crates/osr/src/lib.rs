#![forbid(unsafe_code)]

//! Off-screen browser bridge public facade.
//!
//! Re-exports the types a host application touches day to day and offers
//! a prelude. Internals live in `osr-core`, `osr-input`, `osr-frame` and
//! `osr-session`.

// --- Core re-exports -------------------------------------------------------

pub use osr_core::{
    BridgeConfig, BrowserSettings, EngineKeyEvent, EngineKeyKind, EngineMouseEvent, EventFlags,
    HostKey, HostKeyEvent, HostMouseEvent, KeyPlatform, ModifierState, MouseButton, Point, Rect,
    ScreenInfo, ShortcutStage, ViewGeometry,
};

// --- Input re-exports ------------------------------------------------------

pub use osr_input::{
    CompositionPhase, CompositionUnderline, CompositionUpdate, HostInput, ImeCall, InputRecorder,
    Utf16Range, route_key,
};

// --- Frame re-exports ------------------------------------------------------

pub use osr_frame::{
    CompositePlan, FrameBuffer, FrameError, FrameReader, FrameStats, PaintElement, PopupLayer,
    SharedSurfaceHandle, SoftwareFrame,
};

// --- Session re-exports ----------------------------------------------------

pub use osr_session::{
    BrowserHost, ContextMenu, ContextMenuParams, CursorType, DocumentFrame, EditCommand,
    HostCursor, InputSink, LifecycleSink, MenuItem, PaintSink, PreKeyOutcome, RegistryError,
    Session, SessionId, SessionRegistry, SessionState,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for host applications.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// An input trace did not parse.
    #[error("input trace: {0}")]
    Trace(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Parse a JSON-lines input trace.
pub fn load_trace(text: &str) -> Result<Vec<HostInput>> {
    Ok(InputRecorder::parse_jsonl(text)?)
}

/// Replay a JSON-lines input trace into the session registered as `id`.
pub fn replay_trace(registry: &SessionRegistry, id: SessionId, text: &str) -> Result<usize> {
    let inputs = load_trace(text)?;
    let session = registry.get(id)?;
    Ok(session.replay(&inputs))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BridgeConfig, BridgeError, BrowserHost, CompositePlan, EditCommand, HostKey, HostKeyEvent,
        HostMouseEvent, InputSink, LifecycleSink, ModifierState, PaintSink, Point, Rect, Result,
        Session, SessionRegistry, ViewGeometry,
    };

    pub use crate::{core, frame, input, session};
}

pub use osr_core as core;
pub use osr_frame as frame;
pub use osr_input as input;
pub use osr_session as session;

#[cfg(feature = "tracing-json")]
pub use osr_core::logging::init_json_logging;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_session_surfaces_as_registry_error() {
        let registry = SessionRegistry::new();
        let err = replay_trace(&registry, SessionId(9), "").unwrap_err();
        assert!(matches!(err, BridgeError::Registry(RegistryError::UnknownSession(SessionId(9)))));
    }

    #[test]
    fn malformed_trace_is_reported() {
        let err = load_trace("{\"kind\":\"nope\"}").unwrap_err();
        assert!(err.to_string().starts_with("input trace:"));
    }

    #[test]
    fn trace_replays_into_a_session_without_browser() {
        let registry = SessionRegistry::new();
        let session = registry.create(BridgeConfig::for_platform(KeyPlatform::Linux));
        let trace = "{\"kind\":\"focus\",\"focused\":true}\n{\"kind\":\"commit\",\"text\":\"hi\"}\n";
        assert_eq!(replay_trace(&registry, session.id(), trace).unwrap(), 2);
        assert_eq!(session.state(), SessionState::Creating);
    }
}
