#![forbid(unsafe_code)]

//! Host and engine input event types.
//!
//! Two vocabularies live here:
//!
//! - **Host events** ([`HostKeyEvent`], [`HostMouseEvent`]) are what the
//!   native window system hands us.
//! - **Engine events** ([`EngineKeyEvent`], [`EngineMouseEvent`]) mirror the
//!   embedded browser's native event structures and are what gets injected.
//!
//! # Design Notes
//!
//! - `ModifierState` is derived per event and never persisted.
//! - `EventFlags` follows the engine's bit layout so adapters can pass
//!   `bits()` straight through.

use bitflags::bitflags;

use crate::geometry::Point;
use crate::keys::HostKey;

bitflags! {
    /// Modifier keys held during a host event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierState: u8 {
        /// No modifiers.
        const NONE      = 0b0000_0000;
        /// Shift key.
        const SHIFT     = 0b0000_0001;
        /// Control key.
        const CONTROL   = 0b0000_0010;
        /// Alt/Option key.
        const ALT       = 0b0000_0100;
        /// Command/Meta/Super key.
        const COMMAND   = 0b0000_1000;
        /// Caps lock is engaged.
        const CAPS_LOCK = 0b0001_0000;
        /// Num lock is engaged.
        const NUM_LOCK  = 0b0010_0000;
    }
}

impl Default for ModifierState {
    fn default() -> Self {
        Self::NONE
    }
}

impl ModifierState {
    /// Convert into the engine's modifier flags.
    #[must_use]
    pub fn to_event_flags(self) -> EventFlags {
        let mut flags = EventFlags::NONE;
        if self.contains(Self::SHIFT) {
            flags |= EventFlags::SHIFT_DOWN;
        }
        if self.contains(Self::CONTROL) {
            flags |= EventFlags::CONTROL_DOWN;
        }
        if self.contains(Self::ALT) {
            flags |= EventFlags::ALT_DOWN;
        }
        if self.contains(Self::COMMAND) {
            flags |= EventFlags::COMMAND_DOWN;
        }
        if self.contains(Self::CAPS_LOCK) {
            flags |= EventFlags::CAPS_LOCK_ON;
        }
        if self.contains(Self::NUM_LOCK) {
            flags |= EventFlags::NUM_LOCK_ON;
        }
        flags
    }
}

bitflags! {
    /// Engine event flags (keyboard and mouse).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventFlags: u32 {
        const NONE                = 0;
        const CAPS_LOCK_ON        = 1 << 0;
        const SHIFT_DOWN          = 1 << 1;
        const CONTROL_DOWN        = 1 << 2;
        const ALT_DOWN            = 1 << 3;
        const LEFT_MOUSE_BUTTON   = 1 << 4;
        const MIDDLE_MOUSE_BUTTON = 1 << 5;
        const RIGHT_MOUSE_BUTTON  = 1 << 6;
        /// Mac OS-X command key.
        const COMMAND_DOWN        = 1 << 7;
        const NUM_LOCK_ON         = 1 << 8;
        const IS_KEY_PAD          = 1 << 9;
        const IS_LEFT             = 1 << 10;
        const IS_RIGHT            = 1 << 11;
        const ALTGR_DOWN          = 1 << 12;
        const IS_REPEAT           = 1 << 13;
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::NONE
    }
}

/// A raw key event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostKeyEvent {
    /// Host keycode.
    pub key: HostKey,
    /// Host scancode, passed through as the native code on platforms that
    /// expect one.
    pub scan_code: u32,
    /// Modifier keys held during the event.
    pub modifiers: ModifierState,
    /// `true` for key-down, `false` for key-up.
    pub pressed: bool,
    /// Set by the host for auto-repeated key-downs.
    pub repeat: bool,
}

impl HostKeyEvent {
    /// Create a key-down event with no modifiers.
    #[must_use]
    pub const fn down(key: HostKey) -> Self {
        Self {
            key,
            scan_code: 0,
            modifiers: ModifierState::NONE,
            pressed: true,
            repeat: false,
        }
    }

    /// Create a key-up event with no modifiers.
    #[must_use]
    pub const fn up(key: HostKey) -> Self {
        Self {
            pressed: false,
            ..Self::down(key)
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: ModifierState) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attach a scancode.
    #[must_use]
    pub const fn with_scan_code(mut self, scan_code: u32) -> Self {
        self.scan_code = scan_code;
        self
    }

    /// Mark as auto-repeat.
    #[must_use]
    pub const fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// The engine flag that marks this button as held.
    #[must_use]
    pub const fn held_flag(self) -> EventFlags {
        match self {
            Self::Left => EventFlags::LEFT_MOUSE_BUTTON,
            Self::Middle => EventFlags::MIDDLE_MOUSE_BUTTON,
            Self::Right => EventFlags::RIGHT_MOUSE_BUTTON,
        }
    }
}

/// A raw mouse event from the host, in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostMouseEvent {
    /// Pointer moved. `leave` is set when the pointer left the view.
    Move {
        position: Point,
        modifiers: ModifierState,
        leave: bool,
    },
    /// Button pressed or released.
    Button {
        position: Point,
        button: MouseButton,
        pressed: bool,
        click_count: u32,
        modifiers: ModifierState,
    },
    /// Wheel scrolled. Deltas are in host units (usually lines or pixels).
    Wheel {
        position: Point,
        delta_x: f32,
        delta_y: f32,
        modifiers: ModifierState,
    },
}

impl HostMouseEvent {
    /// Pointer position of the event.
    #[must_use]
    pub const fn position(&self) -> Point {
        match self {
            Self::Move { position, .. }
            | Self::Button { position, .. }
            | Self::Wheel { position, .. } => *position,
        }
    }
}

/// Engine key event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineKeyKind {
    /// Key press without character translation.
    #[default]
    RawKeyDown,
    /// Key press with character translation (not produced by the router).
    KeyDown,
    /// Key release.
    KeyUp,
    /// Character input.
    Char,
}

impl EngineKeyKind {
    /// Whether this event is one of the "down" kinds.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::RawKeyDown | Self::KeyDown)
    }
}

/// Key event in the engine's native structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EngineKeyEvent {
    pub kind: EngineKeyKind,
    pub modifiers: EventFlags,
    /// Windows-style virtual key code.
    pub windows_key_code: i32,
    /// Platform native key code (kVK code on macOS, scancode elsewhere).
    pub native_key_code: i32,
    /// Set for Alt-modified keys on Windows.
    pub is_system_key: bool,
    /// UTF-16 code unit produced by the key, 0 if none.
    pub character: u16,
    /// Character the key would produce without modifiers.
    pub unmodified_character: u16,
    /// Filled in by the engine; ignored on injection.
    pub focus_on_editable_field: bool,
}

impl EngineKeyEvent {
    /// Whether the event carries the given engine modifier.
    #[inline]
    #[must_use]
    pub const fn has(&self, flag: EventFlags) -> bool {
        self.modifiers.contains(flag)
    }
}

/// Mouse event in the engine's native structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EngineMouseEvent {
    pub x: i32,
    pub y: i32,
    pub modifiers: EventFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_default() {
        assert_eq!(ModifierState::default(), ModifierState::NONE);
        assert_eq!(EventFlags::default(), EventFlags::NONE);
    }

    #[test]
    fn modifier_state_maps_to_engine_bits() {
        let flags = (ModifierState::SHIFT | ModifierState::COMMAND).to_event_flags();
        assert_eq!(flags, EventFlags::SHIFT_DOWN | EventFlags::COMMAND_DOWN);
        assert_eq!(flags.bits(), 0b1000_0010);

        let locks = (ModifierState::CAPS_LOCK | ModifierState::NUM_LOCK).to_event_flags();
        assert_eq!(locks, EventFlags::CAPS_LOCK_ON | EventFlags::NUM_LOCK_ON);
    }

    #[test]
    fn host_key_event_builders() {
        let ev = HostKeyEvent::down(HostKey::A)
            .with_modifiers(ModifierState::SHIFT)
            .with_scan_code(4)
            .repeated();
        assert!(ev.pressed);
        assert!(ev.repeat);
        assert_eq!(ev.scan_code, 4);
        assert_eq!(ev.modifiers, ModifierState::SHIFT);

        let up = HostKeyEvent::up(HostKey::A);
        assert!(!up.pressed);
        assert_eq!(up.key, HostKey::A);
    }

    #[test]
    fn mouse_event_position() {
        let ev = HostMouseEvent::Button {
            position: Point::new(10, 20),
            button: MouseButton::Left,
            pressed: true,
            click_count: 2,
            modifiers: ModifierState::NONE,
        };
        assert_eq!(ev.position(), Point::new(10, 20));
    }

    #[test]
    fn engine_key_kind_down() {
        assert!(EngineKeyKind::RawKeyDown.is_down());
        assert!(EngineKeyKind::KeyDown.is_down());
        assert!(!EngineKeyKind::KeyUp.is_down());
        assert!(!EngineKeyKind::Char.is_down());
    }
}
