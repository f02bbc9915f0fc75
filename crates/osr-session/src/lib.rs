#![forbid(unsafe_code)]

//! Per-browser session context for the off-screen bridge.
//!
//! A [`Session`] ties together input routing ([`osr_input`]), frame
//! hand-off ([`osr_frame`]) and the engine's callback surface
//! ([`sinks`]). The [`SessionRegistry`] owns sessions by id.

pub mod context_menu;
pub mod cursor;
pub mod edit;
pub mod registry;
pub mod session;
pub mod sinks;

pub use context_menu::{ContextMenu, ContextMenuParams, MenuItem, SEPARATOR_ID};
pub use cursor::{CursorCell, CursorType, HostCursor};
pub use edit::{EditCommand, Shortcut, shortcut_command};
pub use registry::{RegistryError, SessionRegistry};
pub use session::{Session, SessionId, SessionState};
pub use sinks::{BrowserHost, DocumentFrame, InputSink, LifecycleSink, PaintSink, PreKeyOutcome};
