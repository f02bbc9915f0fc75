#![forbid(unsafe_code)]

//! Input translation for the off-screen browser bridge.
//!
//! # Primary responsibilities
//! - **keymap**: host keycode → `(virtual_key, native_key, character)`.
//! - **policy**: modifier-only and skip-key-up classification.
//! - **router**: combines both into the engine key events to inject.
//! - **mouse**: host pointer events → engine mouse events.
//! - **ime**: composition state machine and the engine calls it produces.
//! - **record**: JSONL record/replay schema for host input.
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! the small state carried by [`mouse::MouseTranslator`] and
//! [`ime::ImeBridge`]. Engine calls are returned as values for the session
//! to forward.

pub mod ime;
pub mod keymap;
pub mod mouse;
pub mod policy;
pub mod record;
pub mod router;

pub use ime::{
    CompositionPhase, CompositionState, CompositionUnderline, CompositionUpdate, ImeAnchor,
    ImeBridge, ImeCall, ImeCalls, Utf16Range, utf16_len,
};
pub use keymap::{KeyLocation, KeyTranslation, translate};
pub use mouse::{EngineMouseInput, MouseTranslator};
pub use policy::{is_modifier_key, should_skip_key_up, should_suppress_repeat};
pub use record::{HostInput, HostInputRecord, InputRecorder, RecordedButton};
pub use router::{RoutedKeys, route_key};
