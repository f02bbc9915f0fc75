#![forbid(unsafe_code)]

//! Frame delivery bridge.
//!
//! Written from the engine's paint thread, read from the render thread.
//!
//! # Threading
//!
//! | State | Writer | Storage |
//! |-------|--------|---------|
//! | view geometry | host resize | `ArcSwap` snapshot |
//! | main frame | `on_paint` / `on_accelerated_paint` | [`LatestSlot`] |
//! | popup frame | same, `PaintElement::Popup` | [`LatestSlot`] |
//! | popup state | `on_popup_show` / `on_popup_size` | `ArcSwap` + version |
//! | stats | every paint | atomics |
//!
//! No call blocks. The render thread either asks for a
//! [`CompositePlan`] directly or keeps a [`FrameReader`] that only yields a
//! plan when something changed since its last poll.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use tracing::trace;

use osr_core::geometry::{Rect, ScreenInfo, ViewGeometry};

use crate::error::Result;
use crate::frame::{FrameBuffer, PaintElement, SharedSurfaceHandle, SoftwareFrame, SurfaceFrame};
use crate::popup::PopupState;
use crate::slot::{LatestSlot, Stamped};
use crate::view::ViewState;

/// A frame as seen by the renderer.
pub type PublishedFrame = Arc<Stamped<FrameBuffer>>;

/// Counters for debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Software paints accepted.
    pub paints: u64,
    /// Accelerated paints accepted.
    pub accelerated_paints: u64,
    /// Paints rejected (malformed buffer, wrong paint path).
    pub dropped: u64,
    /// Frames replaced before the renderer consumed them.
    pub superseded: u64,
    /// Pixel bytes copied out of engine buffers.
    pub bytes_copied: u64,
}

/// The popup layer to draw on top of the main frame.
#[derive(Debug, Clone)]
pub struct PopupLayer {
    pub frame: PublishedFrame,
    /// Destination in device pixels.
    pub rect: Rect,
}

/// Everything the renderer needs for one display tick.
#[derive(Debug, Clone)]
pub struct CompositePlan {
    pub view: ViewGeometry,
    pub main: Option<PublishedFrame>,
    /// Present only while the popup is visible and has both a rect and a
    /// frame.
    pub popup: Option<PopupLayer>,
}

#[derive(Default)]
struct Counters {
    paints: AtomicU64,
    accelerated_paints: AtomicU64,
    dropped: AtomicU64,
    bytes_copied: AtomicU64,
}

pub struct FrameBridge {
    view: ViewState,
    accelerated: bool,
    main: LatestSlot<FrameBuffer>,
    popup: LatestSlot<FrameBuffer>,
    popup_state: ArcSwap<PopupState>,
    popup_version: AtomicU64,
    counters: Counters,
}

impl FrameBridge {
    /// Create a bridge. `accelerated` selects the shared-surface paint path;
    /// paints arriving on the other path are dropped.
    #[must_use]
    pub fn new(initial: ViewGeometry, accelerated: bool) -> Self {
        Self {
            view: ViewState::new(initial),
            accelerated,
            main: LatestSlot::new(),
            popup: LatestSlot::new(),
            popup_state: ArcSwap::from_pointee(PopupState::default()),
            popup_version: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    #[must_use]
    pub const fn is_accelerated(&self) -> bool {
        self.accelerated
    }

    #[must_use]
    pub fn view(&self) -> ViewGeometry {
        self.view.load()
    }

    /// Synchronous view-rect answer for the engine.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view.view_rect()
    }

    #[must_use]
    pub fn screen_info(&self) -> ScreenInfo {
        self.view.screen_info()
    }

    /// Host resize. Returns `true` if the geometry changed.
    pub fn resize(&self, geometry: ViewGeometry) -> bool {
        self.view.store(geometry)
    }

    fn slot(&self, element: PaintElement) -> &LatestSlot<FrameBuffer> {
        match element {
            PaintElement::View => &self.main,
            PaintElement::Popup => &self.popup,
        }
    }

    /// Software paint. Copies `buffer` before returning.
    ///
    /// Returns the published sequence number, or `None` when the bridge is
    /// on the accelerated path.
    pub fn on_paint(
        &self,
        element: PaintElement,
        dirty_rects: &[Rect],
        buffer: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Option<u64>> {
        if self.accelerated {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            trace!(target: "osr::frame", ?element, "software paint ignored on accelerated path");
            return Ok(None);
        }

        let slot = self.slot(element);
        let density = self.view.load().pixel_density;
        let (frame, copied) = SoftwareFrame::copy_from(buffer, width, height, density, dirty_rects)
            .inspect_err(|_| {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            })?;

        let seq = slot.publish(FrameBuffer::Software(frame));
        self.counters.paints.fetch_add(1, Ordering::Relaxed);
        self.counters
            .bytes_copied
            .fetch_add(copied as u64, Ordering::Relaxed);
        trace!(
            target: "osr::frame",
            ?element,
            seq,
            width,
            height,
            dirty = dirty_rects.len(),
            copied,
            "paint"
        );
        Ok(Some(seq))
    }

    /// Accelerated paint. The new handle supersedes the previous one.
    pub fn on_accelerated_paint(
        &self,
        element: PaintElement,
        dirty_rects: &[Rect],
        handle: SharedSurfaceHandle,
        width: u32,
        height: u32,
    ) -> Option<u64> {
        if !self.accelerated {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            trace!(target: "osr::frame", ?element, "accelerated paint ignored on software path");
            return None;
        }
        let seq = self.slot(element).publish(FrameBuffer::Accelerated(SurfaceFrame {
            handle,
            width,
            height,
            dirty_rects: dirty_rects.to_vec(),
        }));
        self.counters
            .accelerated_paints
            .fetch_add(1, Ordering::Relaxed);
        trace!(target: "osr::frame", ?element, seq, handle = handle.0, "accelerated paint");
        Some(seq)
    }

    /// Popup show/hide. Hiding also drops the popup frame.
    pub fn on_popup_show(&self, visible: bool) {
        self.popup_state.rcu(|state| state.show(visible));
        if !visible {
            self.popup.clear();
        }
        self.popup_version.fetch_add(1, Ordering::AcqRel);
        trace!(target: "osr::frame", visible, "popup show");
    }

    /// Popup bounds in view coordinates.
    pub fn on_popup_size(&self, rect: Rect) {
        self.popup_state.rcu(|state| state.resize(rect));
        self.popup_version.fetch_add(1, Ordering::AcqRel);
        trace!(target: "osr::frame", ?rect, "popup size");
    }

    #[must_use]
    pub fn popup_state(&self) -> PopupState {
        **self.popup_state.load()
    }

    fn plan(
        &self,
        main: Option<PublishedFrame>,
        popup_frame: Option<PublishedFrame>,
    ) -> CompositePlan {
        let view = self.view.load();
        let popup = self
            .popup_state()
            .device_rect(&view)
            .zip(popup_frame)
            .map(|(rect, frame)| PopupLayer { frame, rect });
        CompositePlan { view, main, popup }
    }

    /// Latest main frame plus the popup layer when it should be drawn.
    /// Both frames count as consumed, so paints the renderer did see are
    /// not reported as superseded.
    #[must_use]
    pub fn composite_plan(&self) -> CompositePlan {
        self.plan(self.main.poll(0), self.popup.poll(0))
    }

    /// A reader that yields plans only when something changed.
    #[must_use]
    pub fn reader(&self) -> FrameReader {
        FrameReader::default()
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            paints: self.counters.paints.load(Ordering::Relaxed),
            accelerated_paints: self.counters.accelerated_paints.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            superseded: self.main.superseded() + self.popup.superseded(),
            bytes_copied: self.counters.bytes_copied.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for FrameBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBridge")
            .field("view", &self.view)
            .field("accelerated", &self.accelerated)
            .field("popup", &self.popup_state())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Render-side cursor into a [`FrameBridge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReader {
    main_seen: u64,
    popup_seen: u64,
    popup_version_seen: u64,
}

impl FrameReader {
    /// A plan if the main frame, the popup frame or the popup state changed
    /// since the last successful poll.
    pub fn poll(&mut self, bridge: &FrameBridge) -> Option<CompositePlan> {
        let main = bridge.main.poll(self.main_seen);
        let popup = bridge.popup.poll(self.popup_seen);
        let popup_version = bridge.popup_version.load(Ordering::Acquire);
        if main.is_none() && popup.is_none() && popup_version == self.popup_version_seen {
            return None;
        }
        if let Some(frame) = &main {
            self.main_seen = frame.seq;
        }
        if let Some(frame) = &popup {
            self.popup_seen = frame.seq;
        }
        self.popup_version_seen = popup_version;
        Some(bridge.plan(
            main.or_else(|| bridge.main.latest()),
            popup.or_else(|| bridge.popup.latest()),
        ))
    }
}
