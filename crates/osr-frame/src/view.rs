#![forbid(unsafe_code)]

//! View geometry shared between the host's resize path and the engine's
//! synchronous view-rect queries.
//!
//! Width, height and density are swapped in as one snapshot, so a query
//! racing a resize sees either the old geometry or the new one, never the
//! new width with the old height.

use arc_swap::ArcSwap;

use osr_core::geometry::{Rect, ScreenInfo, ViewGeometry};

pub struct ViewState {
    inner: ArcSwap<ViewGeometry>,
}

impl ViewState {
    #[must_use]
    pub fn new(initial: ViewGeometry) -> Self {
        Self {
            inner: ArcSwap::from_pointee(initial),
        }
    }

    /// Current geometry. Wait-free.
    #[inline]
    #[must_use]
    pub fn load(&self) -> ViewGeometry {
        **self.inner.load()
    }

    /// Replace the geometry. Returns `true` if it changed.
    pub fn store(&self, geometry: ViewGeometry) -> bool {
        let previous = self.inner.swap(std::sync::Arc::new(geometry));
        *previous != geometry
    }

    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.load().view_rect()
    }

    #[must_use]
    pub fn screen_info(&self) -> ScreenInfo {
        ScreenInfo::from(self.load())
    }
}

impl std::fmt::Debug for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ViewState").field(&self.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_reports_change() {
        let view = ViewState::new(ViewGeometry::new(100, 50, 1.0));
        assert!(!view.store(ViewGeometry::new(100, 50, 1.0)));
        assert!(view.store(ViewGeometry::new(200, 50, 2.0)));
        assert_eq!(view.view_rect(), Rect::from_size(200, 50));
        assert_eq!(view.screen_info().device_scale_factor, 2.0);
    }
}
