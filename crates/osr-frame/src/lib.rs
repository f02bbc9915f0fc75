#![forbid(unsafe_code)]

//! Frame delivery for the off-screen browser bridge.
//!
//! The engine paints on its own thread; the host renders on another. This
//! crate sits between them with latest-value semantics: every paint replaces
//! the previous frame of its layer, and the renderer always draws the
//! newest main frame plus the popup layer when it is visible.
//!
//! - [`view`]: torn-read-free view geometry for the engine's size queries.
//! - [`frame`]: owned software frames and shared-surface handles.
//! - [`slot`]: the sequence-numbered latest-value slot.
//! - [`popup`]: popup show/size state.
//! - [`bridge`]: [`FrameBridge`], tying the above together.

pub mod bridge;
pub mod error;
pub mod frame;
pub mod popup;
pub mod slot;
pub mod view;

pub use bridge::{CompositePlan, FrameBridge, FrameReader, FrameStats, PopupLayer, PublishedFrame};
pub use error::FrameError;
pub use frame::{
    BYTES_PER_PIXEL, FrameBuffer, PaintElement, SharedSurfaceHandle, SoftwareFrame, SurfaceFrame,
};
pub use popup::PopupState;
pub use slot::{LatestSlot, Stamped};
pub use view::ViewState;
