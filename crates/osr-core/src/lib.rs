#![forbid(unsafe_code)]

//! Core: shared vocabulary for the off-screen browser bridge.
//!
//! # Role in the workspace
//! `osr-core` is the leaf crate. It owns the geometric primitives, the
//! host-side input vocabulary (SDL-style keycodes, modifier bitflags, mouse
//! events), the engine-side event structures that get injected into the
//! embedded browser, the bridge configuration, and logging helpers.
//!
//! # How it fits in the system
//! `osr-input` translates host events into engine events, `osr-frame`
//! carries paint callbacks to the render thread, and `osr-session` ties
//! both to a live browser. None of them depend on each other's internals;
//! they only share the types defined here.

pub mod config;
pub mod event;
pub mod geometry;
pub mod keys;
pub mod logging;

pub use config::{BridgeConfig, BrowserSettings, KeyPlatform, ShortcutStage};
pub use event::{
    EngineKeyEvent, EngineKeyKind, EngineMouseEvent, EventFlags, HostKeyEvent, HostMouseEvent,
    ModifierState, MouseButton,
};
pub use geometry::{Point, Rect, ScreenInfo, ViewGeometry};
pub use keys::HostKey;
