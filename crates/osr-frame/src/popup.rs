#![forbid(unsafe_code)]

//! Popup layer state (select dropdowns, autofill lists).
//!
//! The engine announces the popup with two independent notifications that
//! may arrive in either order: show/hide and size. Hiding forgets the rect;
//! a size received while hidden is remembered but nothing renders until the
//! next show.

use osr_core::geometry::{Rect, ViewGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PopupState {
    pub visible: bool,
    /// Popup bounds in view coordinates.
    pub rect: Rect,
}

impl PopupState {
    /// Apply a show/hide notification.
    #[must_use]
    pub fn show(self, visible: bool) -> Self {
        if visible {
            Self {
                visible: true,
                ..self
            }
        } else {
            Self::default()
        }
    }

    /// Apply a size notification.
    #[must_use]
    pub fn resize(self, rect: Rect) -> Self {
        Self { rect, ..self }
    }

    /// Whether the popup layer should be drawn at all.
    #[must_use]
    pub fn renders(&self) -> bool {
        self.visible && !self.rect.is_empty()
    }

    /// Popup rect clamped into the view and scaled to device pixels, or
    /// `None` when the popup should not be drawn.
    #[must_use]
    pub fn device_rect(&self, view: &ViewGeometry) -> Option<Rect> {
        if !self.renders() {
            return None;
        }
        Some(
            self.rect
                .clamp_within(&view.view_rect())
                .scale(view.pixel_density),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_before_show_is_remembered() {
        let state = PopupState::default().resize(Rect::new(10, 10, 50, 80));
        assert!(!state.renders());
        let shown = state.show(true);
        assert!(shown.renders());
        assert_eq!(shown.rect, Rect::new(10, 10, 50, 80));
    }

    #[test]
    fn hide_clears_rect() {
        let state = PopupState::default()
            .show(true)
            .resize(Rect::new(1, 2, 3, 4))
            .show(false);
        assert_eq!(state, PopupState::default());
    }

    #[test]
    fn device_rect_is_clamped_and_scaled() {
        let view = ViewGeometry::new(100, 100, 2.0);
        let state = PopupState::default()
            .show(true)
            .resize(Rect::new(-5, 90, 20, 20));
        assert_eq!(state.device_rect(&view), Some(Rect::new(0, 160, 40, 40)));
        assert_eq!(PopupState::default().device_rect(&view), None);
    }
}
