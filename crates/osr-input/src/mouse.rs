#![forbid(unsafe_code)]

//! Host pointer events → engine mouse events.
//!
//! The engine wants held buttons in every mouse event's modifier flags, so
//! the translator remembers which buttons are down between events. Losing
//! focus forgets them.

use osr_core::event::{EngineMouseEvent, EventFlags, HostMouseEvent, MouseButton};
use osr_core::geometry::Point;

/// A translated mouse event, ready to hand to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineMouseInput {
    Move {
        event: EngineMouseEvent,
        leave: bool,
    },
    Click {
        event: EngineMouseEvent,
        button: MouseButton,
        mouse_up: bool,
        click_count: u32,
    },
    Wheel {
        event: EngineMouseEvent,
        delta_x: i32,
        delta_y: i32,
    },
}

impl EngineMouseInput {
    #[must_use]
    pub const fn event(&self) -> EngineMouseEvent {
        match self {
            Self::Move { event, .. } | Self::Click { event, .. } | Self::Wheel { event, .. } => {
                *event
            }
        }
    }

    /// Whether this is a button press (used to pull focus into the view).
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self, Self::Click { mouse_up: false, .. })
    }
}

/// Stateful pointer translator.
#[derive(Debug, Clone)]
pub struct MouseTranslator {
    held: EventFlags,
    wheel_scale: f32,
    last_position: Point,
}

impl Default for MouseTranslator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MouseTranslator {
    /// Create a translator multiplying wheel deltas by `wheel_scale`.
    #[must_use]
    pub fn new(wheel_scale: f32) -> Self {
        Self {
            held: EventFlags::NONE,
            wheel_scale: if wheel_scale.is_finite() { wheel_scale } else { 1.0 },
            last_position: Point::default(),
        }
    }

    /// Buttons currently held.
    #[must_use]
    pub const fn held_buttons(&self) -> EventFlags {
        self.held
    }

    /// Last pointer position seen, in view coordinates.
    #[must_use]
    pub const fn last_position(&self) -> Point {
        self.last_position
    }

    fn engine_event(&self, position: Point, modifiers: EventFlags) -> EngineMouseEvent {
        EngineMouseEvent {
            x: position.x,
            y: position.y,
            modifiers: modifiers | self.held,
        }
    }

    /// Translate one host event.
    pub fn translate(&mut self, event: &HostMouseEvent) -> EngineMouseInput {
        self.last_position = event.position();
        match *event {
            HostMouseEvent::Move {
                position,
                modifiers,
                leave,
            } => EngineMouseInput::Move {
                event: self.engine_event(position, modifiers.to_event_flags()),
                leave,
            },
            HostMouseEvent::Button {
                position,
                button,
                pressed,
                click_count,
                modifiers,
            } => {
                // The press carries its own button flag; the release does not.
                if pressed {
                    self.held |= button.held_flag();
                } else {
                    self.held -= button.held_flag();
                }
                EngineMouseInput::Click {
                    event: self.engine_event(position, modifiers.to_event_flags()),
                    button,
                    mouse_up: !pressed,
                    click_count: click_count.max(1),
                }
            }
            HostMouseEvent::Wheel {
                position,
                delta_x,
                delta_y,
                modifiers,
            } => EngineMouseInput::Wheel {
                event: self.engine_event(position, modifiers.to_event_flags()),
                delta_x: self.scale(delta_x),
                delta_y: self.scale(delta_y),
            },
        }
    }

    fn scale(&self, delta: f32) -> i32 {
        let scaled = (delta * self.wheel_scale).round();
        if scaled.is_finite() {
            scaled.clamp(i32::MIN as f32, i32::MAX as f32) as i32
        } else {
            0
        }
    }

    /// Focus change. Losing focus releases every held button.
    pub fn handle_focus(&mut self, focused: bool) {
        if !focused {
            self.held = EventFlags::NONE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osr_core::event::ModifierState;

    fn button(pressed: bool, button: MouseButton) -> HostMouseEvent {
        HostMouseEvent::Button {
            position: Point::new(5, 6),
            button,
            pressed,
            click_count: 1,
            modifiers: ModifierState::NONE,
        }
    }

    fn moved(x: i32, y: i32) -> HostMouseEvent {
        HostMouseEvent::Move {
            position: Point::new(x, y),
            modifiers: ModifierState::NONE,
            leave: false,
        }
    }

    #[test]
    fn drag_carries_held_button() {
        let mut mouse = MouseTranslator::default();
        let press = mouse.translate(&button(true, MouseButton::Left));
        assert!(press.is_press());
        assert!(press.event().modifiers.contains(EventFlags::LEFT_MOUSE_BUTTON));

        let drag = mouse.translate(&moved(10, 10));
        assert!(drag.event().modifiers.contains(EventFlags::LEFT_MOUSE_BUTTON));
        assert_eq!((drag.event().x, drag.event().y), (10, 10));

        let release = mouse.translate(&button(false, MouseButton::Left));
        assert!(!release.is_press());
        assert!(!release.event().modifiers.contains(EventFlags::LEFT_MOUSE_BUTTON));
        assert_eq!(mouse.held_buttons(), EventFlags::NONE);
    }

    #[test]
    fn focus_loss_releases_buttons() {
        let mut mouse = MouseTranslator::default();
        mouse.translate(&button(true, MouseButton::Right));
        mouse.handle_focus(false);
        let ev = mouse.translate(&moved(1, 1));
        assert_eq!(ev.event().modifiers, EventFlags::NONE);
    }

    #[test]
    fn wheel_is_scaled_and_rounded() {
        let mut mouse = MouseTranslator::new(2.5);
        let ev = mouse.translate(&HostMouseEvent::Wheel {
            position: Point::new(0, 0),
            delta_x: 0.0,
            delta_y: -3.0,
            modifiers: ModifierState::SHIFT,
        });
        match ev {
            EngineMouseInput::Wheel {
                event,
                delta_x,
                delta_y,
            } => {
                assert_eq!(delta_x, 0);
                assert_eq!(delta_y, -8);
                assert!(event.modifiers.contains(EventFlags::SHIFT_DOWN));
            }
            other => panic!("expected wheel, got {other:?}"),
        }
    }

    #[test]
    fn click_count_is_at_least_one() {
        let mut mouse = MouseTranslator::default();
        let ev = mouse.translate(&HostMouseEvent::Button {
            position: Point::new(0, 0),
            button: MouseButton::Left,
            pressed: true,
            click_count: 0,
            modifiers: ModifierState::NONE,
        });
        assert!(matches!(ev, EngineMouseInput::Click { click_count: 1, .. }));
    }
}
