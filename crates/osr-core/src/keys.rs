#![forbid(unsafe_code)]

//! Host keycode vocabulary.
//!
//! The bridge accepts one host input source: SDL3-style virtual keycodes.
//! Printable keys use their unshifted ASCII value; every other key is its
//! USB HID scancode with bit 30 set. [`HostKey`] keeps the raw value so
//! that unknown keys can pass through untouched.

/// Bit marking a keycode that was derived from a scancode.
pub const SCANCODE_MASK: u32 = 1 << 30;

const fn sc(scancode: u32) -> HostKey {
    HostKey(scancode | SCANCODE_MASK)
}

/// A host key identifier (SDL3 keycode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HostKey(pub u32);

impl HostKey {
    pub const UNKNOWN: Self = Self(0);

    pub const BACKSPACE: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const RETURN: Self = Self(0x0D);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const APOSTROPHE: Self = Self(0x27);
    pub const COMMA: Self = Self(0x2C);
    pub const MINUS: Self = Self(0x2D);
    pub const PERIOD: Self = Self(0x2E);
    pub const SLASH: Self = Self(0x2F);
    pub const NUM_0: Self = Self(0x30);
    pub const NUM_1: Self = Self(0x31);
    pub const NUM_2: Self = Self(0x32);
    pub const NUM_3: Self = Self(0x33);
    pub const NUM_4: Self = Self(0x34);
    pub const NUM_5: Self = Self(0x35);
    pub const NUM_6: Self = Self(0x36);
    pub const NUM_7: Self = Self(0x37);
    pub const NUM_8: Self = Self(0x38);
    pub const NUM_9: Self = Self(0x39);
    pub const SEMICOLON: Self = Self(0x3B);
    pub const EQUALS: Self = Self(0x3D);
    pub const LEFT_BRACKET: Self = Self(0x5B);
    pub const BACKSLASH: Self = Self(0x5C);
    pub const RIGHT_BRACKET: Self = Self(0x5D);
    pub const GRAVE: Self = Self(0x60);
    pub const A: Self = Self(0x61);
    pub const B: Self = Self(0x62);
    pub const C: Self = Self(0x63);
    pub const D: Self = Self(0x64);
    pub const E: Self = Self(0x65);
    pub const F: Self = Self(0x66);
    pub const G: Self = Self(0x67);
    pub const H: Self = Self(0x68);
    pub const I: Self = Self(0x69);
    pub const J: Self = Self(0x6A);
    pub const K: Self = Self(0x6B);
    pub const L: Self = Self(0x6C);
    pub const M: Self = Self(0x6D);
    pub const N: Self = Self(0x6E);
    pub const O: Self = Self(0x6F);
    pub const P: Self = Self(0x70);
    pub const Q: Self = Self(0x71);
    pub const R: Self = Self(0x72);
    pub const S: Self = Self(0x73);
    pub const T: Self = Self(0x74);
    pub const U: Self = Self(0x75);
    pub const V: Self = Self(0x76);
    pub const W: Self = Self(0x77);
    pub const X: Self = Self(0x78);
    pub const Y: Self = Self(0x79);
    pub const Z: Self = Self(0x7A);
    pub const DELETE: Self = Self(0x7F);

    pub const CAPS_LOCK: Self = sc(57);
    pub const F1: Self = sc(58);
    pub const F2: Self = sc(59);
    pub const F3: Self = sc(60);
    pub const F4: Self = sc(61);
    pub const F5: Self = sc(62);
    pub const F6: Self = sc(63);
    pub const F7: Self = sc(64);
    pub const F8: Self = sc(65);
    pub const F9: Self = sc(66);
    pub const F10: Self = sc(67);
    pub const F11: Self = sc(68);
    pub const F12: Self = sc(69);
    pub const PRINT_SCREEN: Self = sc(70);
    pub const SCROLL_LOCK: Self = sc(71);
    pub const PAUSE: Self = sc(72);
    pub const INSERT: Self = sc(73);
    pub const HOME: Self = sc(74);
    pub const PAGE_UP: Self = sc(75);
    pub const END: Self = sc(77);
    pub const PAGE_DOWN: Self = sc(78);
    pub const RIGHT: Self = sc(79);
    pub const LEFT: Self = sc(80);
    pub const DOWN: Self = sc(81);
    pub const UP: Self = sc(82);
    pub const NUM_LOCK_CLEAR: Self = sc(83);
    pub const KP_DIVIDE: Self = sc(84);
    pub const KP_MULTIPLY: Self = sc(85);
    pub const KP_MINUS: Self = sc(86);
    pub const KP_PLUS: Self = sc(87);
    pub const KP_ENTER: Self = sc(88);
    pub const KP_1: Self = sc(89);
    pub const KP_2: Self = sc(90);
    pub const KP_3: Self = sc(91);
    pub const KP_4: Self = sc(92);
    pub const KP_5: Self = sc(93);
    pub const KP_6: Self = sc(94);
    pub const KP_7: Self = sc(95);
    pub const KP_8: Self = sc(96);
    pub const KP_9: Self = sc(97);
    pub const KP_0: Self = sc(98);
    pub const KP_PERIOD: Self = sc(99);
    pub const KP_EQUALS: Self = sc(103);
    pub const F13: Self = sc(104);
    pub const F14: Self = sc(105);
    pub const F15: Self = sc(106);
    pub const F16: Self = sc(107);
    pub const F17: Self = sc(108);
    pub const F18: Self = sc(109);
    pub const F19: Self = sc(110);
    pub const F20: Self = sc(111);
    pub const HELP: Self = sc(117);
    pub const MUTE: Self = sc(127);
    pub const VOLUME_UP: Self = sc(128);
    pub const VOLUME_DOWN: Self = sc(129);
    pub const KP_CLEAR: Self = sc(216);
    pub const LCTRL: Self = sc(224);
    pub const LSHIFT: Self = sc(225);
    pub const LALT: Self = sc(226);
    pub const LGUI: Self = sc(227);
    pub const RCTRL: Self = sc(228);
    pub const RSHIFT: Self = sc(229);
    pub const RALT: Self = sc(230);
    pub const RGUI: Self = sc(231);

    /// Raw keycode value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this keycode was derived from a scancode (non-printable).
    #[inline]
    #[must_use]
    pub const fn is_scancode_derived(self) -> bool {
        self.0 & SCANCODE_MASK != 0
    }
}

impl From<u32> for HostKey {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_keys_are_ascii() {
        assert_eq!(HostKey::A.raw(), u32::from(b'a'));
        assert_eq!(HostKey::NUM_9.raw(), u32::from(b'9'));
        assert_eq!(HostKey::SEMICOLON.raw(), u32::from(b';'));
        assert!(!HostKey::A.is_scancode_derived());
    }

    #[test]
    fn scancode_keys_carry_mask() {
        assert_eq!(HostKey::F1.raw(), 0x4000_003A);
        assert_eq!(HostKey::RGUI.raw(), 0x4000_00E7);
        assert!(HostKey::UP.is_scancode_derived());
    }
}
