#![forbid(unsafe_code)]

//! Host keycode → engine key code and character mapping.
//!
//! One table drives the whole mapping. Each row carries the Windows virtual
//! key, the macOS kVK code, the unshifted character and the shifted
//! character for a host key. [`translate`] is the only consumer.
//!
//! # Invariants
//!
//! - Codes are shift-invariant: only `character` changes with SHIFT.
//! - Shifted symbols come from the table, never from case folding
//!   (`9` shifts to `(`, `;` to `:`).
//! - Letters are uppercase when exactly one of SHIFT and CAPS_LOCK is set.
//! - Keypad rows have their own native codes even when they produce the
//!   same character as a main-row key.
//! - Keys without text (arrows, modifiers, F-keys, media keys) have
//!   `character == 0`.
//! - Unknown keys pass through: raw host code as the virtual key, the host
//!   scancode as the native key, no character.

use osr_core::config::KeyPlatform;
use osr_core::event::ModifierState;
use osr_core::keys::HostKey;

/// Result of mapping one host key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyTranslation {
    /// Windows-style virtual key code.
    pub virtual_key: i32,
    /// Platform native code: kVK code on macOS, host scancode elsewhere.
    pub native_key: i32,
    /// UTF-16 code unit produced by the key, 0 if none.
    pub character: u16,
}

impl KeyTranslation {
    /// Pass-through translation for keys the table does not know.
    #[must_use]
    pub const fn passthrough(key: HostKey, scan_code: u32) -> Self {
        Self {
            virtual_key: key.raw() as i32,
            native_key: scan_code as i32,
            character: 0,
        }
    }

    /// The code the engine reads on the given platform.
    #[must_use]
    pub const fn authoritative_code(&self, platform: KeyPlatform) -> i32 {
        match platform {
            KeyPlatform::MacOs => self.native_key,
            KeyPlatform::Windows | KeyPlatform::Linux => self.virtual_key,
        }
    }
}

/// Physical location of a key, reported to the engine as location flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyLocation {
    #[default]
    Standard,
    Left,
    Right,
    Keypad,
}

/// Marker for keys that have no macOS virtual key code.
const NO_MAC: u16 = u16::MAX;

#[derive(Debug, Clone, Copy)]
struct KeyEntry {
    key: HostKey,
    vk: u16,
    mac: u16,
    unshifted: u16,
    shifted: u16,
    location: KeyLocation,
}

impl KeyEntry {
    const fn character(&self, modifiers: ModifierState) -> u16 {
        let shift = modifiers.contains(ModifierState::SHIFT);
        let is_letter = self.unshifted >= b'a' as u16 && self.unshifted <= b'z' as u16;
        let upper = if is_letter {
            shift ^ modifiers.contains(ModifierState::CAPS_LOCK)
        } else {
            shift
        };
        if upper { self.shifted } else { self.unshifted }
    }
}

const fn text(key: HostKey, vk: u16, mac: u16, unshifted: char, shifted: char) -> KeyEntry {
    KeyEntry {
        key,
        vk,
        mac,
        unshifted: unshifted as u16,
        shifted: shifted as u16,
        location: KeyLocation::Standard,
    }
}

const fn letter(key: HostKey, mac: u16) -> KeyEntry {
    let lower = key.raw() as u8;
    text(
        key,
        lower.to_ascii_uppercase() as u16,
        mac,
        lower as char,
        lower.to_ascii_uppercase() as char,
    )
}

const fn code(key: HostKey, vk: u16, mac: u16) -> KeyEntry {
    text(key, vk, mac, '\0', '\0')
}

const fn pad(key: HostKey, vk: u16, mac: u16, ch: char) -> KeyEntry {
    let mut entry = text(key, vk, mac, ch, ch);
    entry.location = KeyLocation::Keypad;
    entry
}

const fn side(key: HostKey, vk: u16, mac: u16, location: KeyLocation) -> KeyEntry {
    let mut entry = code(key, vk, mac);
    entry.location = location;
    entry
}

/// Sorted by host keycode; [`lookup`] binary-searches it.
static KEY_TABLE: &[KeyEntry] = &[
    text(HostKey::BACKSPACE, 0x08, 0x33, '\u{8}', '\u{8}'),
    text(HostKey::TAB, 0x09, 0x30, '\t', '\t'),
    text(HostKey::RETURN, 0x0D, 0x24, '\r', '\r'),
    text(HostKey::ESCAPE, 0x1B, 0x35, '\u{1b}', '\u{1b}'),
    text(HostKey::SPACE, 0x20, 0x31, ' ', ' '),
    text(HostKey::APOSTROPHE, 0xDE, 0x27, '\'', '"'),
    text(HostKey::COMMA, 0xBC, 0x2B, ',', '<'),
    text(HostKey::MINUS, 0xBD, 0x1B, '-', '_'),
    text(HostKey::PERIOD, 0xBE, 0x2F, '.', '>'),
    text(HostKey::SLASH, 0xBF, 0x2C, '/', '?'),
    text(HostKey::NUM_0, 0x30, 0x1D, '0', ')'),
    text(HostKey::NUM_1, 0x31, 0x12, '1', '!'),
    text(HostKey::NUM_2, 0x32, 0x13, '2', '@'),
    text(HostKey::NUM_3, 0x33, 0x14, '3', '#'),
    text(HostKey::NUM_4, 0x34, 0x15, '4', '$'),
    text(HostKey::NUM_5, 0x35, 0x17, '5', '%'),
    text(HostKey::NUM_6, 0x36, 0x16, '6', '^'),
    text(HostKey::NUM_7, 0x37, 0x1A, '7', '&'),
    text(HostKey::NUM_8, 0x38, 0x1C, '8', '*'),
    text(HostKey::NUM_9, 0x39, 0x19, '9', '('),
    text(HostKey::SEMICOLON, 0xBA, 0x29, ';', ':'),
    text(HostKey::EQUALS, 0xBB, 0x18, '=', '+'),
    text(HostKey::LEFT_BRACKET, 0xDB, 0x21, '[', '{'),
    text(HostKey::BACKSLASH, 0xDC, 0x2A, '\\', '|'),
    text(HostKey::RIGHT_BRACKET, 0xDD, 0x1E, ']', '}'),
    text(HostKey::GRAVE, 0xC0, 0x32, '`', '~'),
    letter(HostKey::A, 0x00),
    letter(HostKey::B, 0x0B),
    letter(HostKey::C, 0x08),
    letter(HostKey::D, 0x02),
    letter(HostKey::E, 0x0E),
    letter(HostKey::F, 0x03),
    letter(HostKey::G, 0x05),
    letter(HostKey::H, 0x04),
    letter(HostKey::I, 0x22),
    letter(HostKey::J, 0x26),
    letter(HostKey::K, 0x28),
    letter(HostKey::L, 0x25),
    letter(HostKey::M, 0x2E),
    letter(HostKey::N, 0x2D),
    letter(HostKey::O, 0x1F),
    letter(HostKey::P, 0x23),
    letter(HostKey::Q, 0x0C),
    letter(HostKey::R, 0x0F),
    letter(HostKey::S, 0x01),
    letter(HostKey::T, 0x11),
    letter(HostKey::U, 0x20),
    letter(HostKey::V, 0x09),
    letter(HostKey::W, 0x0D),
    letter(HostKey::X, 0x07),
    letter(HostKey::Y, 0x10),
    letter(HostKey::Z, 0x06),
    // Forward delete produces no text.
    code(HostKey::DELETE, 0x2E, 0x75),
    code(HostKey::CAPS_LOCK, 0x14, 0x39),
    code(HostKey::F1, 0x70, 0x7A),
    code(HostKey::F2, 0x71, 0x78),
    code(HostKey::F3, 0x72, 0x63),
    code(HostKey::F4, 0x73, 0x76),
    code(HostKey::F5, 0x74, 0x60),
    code(HostKey::F6, 0x75, 0x61),
    code(HostKey::F7, 0x76, 0x62),
    code(HostKey::F8, 0x77, 0x64),
    code(HostKey::F9, 0x78, 0x65),
    code(HostKey::F10, 0x79, 0x6D),
    code(HostKey::F11, 0x7A, 0x67),
    code(HostKey::F12, 0x7B, 0x6F),
    code(HostKey::PRINT_SCREEN, 0x2C, NO_MAC),
    code(HostKey::SCROLL_LOCK, 0x91, NO_MAC),
    code(HostKey::PAUSE, 0x13, NO_MAC),
    // Mac keyboards put Help where Insert lives.
    code(HostKey::INSERT, 0x2D, 0x72),
    code(HostKey::HOME, 0x24, 0x73),
    code(HostKey::PAGE_UP, 0x21, 0x74),
    code(HostKey::END, 0x23, 0x77),
    code(HostKey::PAGE_DOWN, 0x22, 0x79),
    code(HostKey::RIGHT, 0x27, 0x7C),
    code(HostKey::LEFT, 0x25, 0x7B),
    code(HostKey::DOWN, 0x28, 0x7D),
    code(HostKey::UP, 0x26, 0x7E),
    side(HostKey::NUM_LOCK_CLEAR, 0x90, 0x47, KeyLocation::Keypad),
    pad(HostKey::KP_DIVIDE, 0x6F, 0x4B, '/'),
    pad(HostKey::KP_MULTIPLY, 0x6A, 0x43, '*'),
    pad(HostKey::KP_MINUS, 0x6D, 0x4E, '-'),
    pad(HostKey::KP_PLUS, 0x6B, 0x45, '+'),
    pad(HostKey::KP_ENTER, 0x0D, 0x4C, '\r'),
    pad(HostKey::KP_1, 0x61, 0x53, '1'),
    pad(HostKey::KP_2, 0x62, 0x54, '2'),
    pad(HostKey::KP_3, 0x63, 0x55, '3'),
    pad(HostKey::KP_4, 0x64, 0x56, '4'),
    pad(HostKey::KP_5, 0x65, 0x57, '5'),
    pad(HostKey::KP_6, 0x66, 0x58, '6'),
    pad(HostKey::KP_7, 0x67, 0x59, '7'),
    pad(HostKey::KP_8, 0x68, 0x5B, '8'),
    pad(HostKey::KP_9, 0x69, 0x5C, '9'),
    pad(HostKey::KP_0, 0x60, 0x52, '0'),
    pad(HostKey::KP_PERIOD, 0x6E, 0x41, '.'),
    pad(HostKey::KP_EQUALS, 0xBB, 0x51, '='),
    code(HostKey::F13, 0x7C, 0x69),
    code(HostKey::F14, 0x7D, 0x6B),
    code(HostKey::F15, 0x7E, 0x71),
    code(HostKey::F16, 0x7F, 0x6A),
    code(HostKey::F17, 0x80, 0x40),
    code(HostKey::F18, 0x81, 0x4F),
    code(HostKey::F19, 0x82, 0x50),
    code(HostKey::F20, 0x83, 0x5A),
    code(HostKey::HELP, 0x2F, 0x72),
    code(HostKey::MUTE, 0xAD, 0x4A),
    code(HostKey::VOLUME_UP, 0xAF, 0x48),
    code(HostKey::VOLUME_DOWN, 0xAE, 0x49),
    side(HostKey::KP_CLEAR, 0x0C, 0x47, KeyLocation::Keypad),
    side(HostKey::LCTRL, 0x11, 0x3B, KeyLocation::Left),
    side(HostKey::LSHIFT, 0x10, 0x38, KeyLocation::Left),
    side(HostKey::LALT, 0x12, 0x3A, KeyLocation::Left),
    side(HostKey::LGUI, 0x5B, 0x37, KeyLocation::Left),
    side(HostKey::RCTRL, 0x11, 0x3E, KeyLocation::Right),
    side(HostKey::RSHIFT, 0x10, 0x3C, KeyLocation::Right),
    side(HostKey::RALT, 0x12, 0x3D, KeyLocation::Right),
    side(HostKey::RGUI, 0x5C, 0x36, KeyLocation::Right),
];

fn lookup(key: HostKey) -> Option<&'static KeyEntry> {
    KEY_TABLE
        .binary_search_by_key(&key, |entry| entry.key)
        .ok()
        .map(|idx| &KEY_TABLE[idx])
}

/// Map a host key event onto the engine's key codes and character.
///
/// Total and deterministic: the same inputs always give the same output,
/// and unknown keys degrade to [`KeyTranslation::passthrough`].
#[must_use]
pub fn translate(
    key: HostKey,
    scan_code: u32,
    modifiers: ModifierState,
    platform: KeyPlatform,
) -> KeyTranslation {
    let Some(entry) = lookup(key) else {
        return KeyTranslation::passthrough(key, scan_code);
    };
    let native_key = match platform {
        KeyPlatform::MacOs if entry.mac != NO_MAC => i32::from(entry.mac),
        _ => scan_code as i32,
    };
    KeyTranslation {
        virtual_key: i32::from(entry.vk),
        native_key,
        character: entry.character(modifiers),
    }
}

/// Character the key produces with no modifiers held.
#[must_use]
pub fn unmodified_character(key: HostKey) -> u16 {
    lookup(key).map_or(0, |entry| entry.unshifted)
}

/// Physical location of the key.
#[must_use]
pub fn key_location(key: HostKey) -> KeyLocation {
    lookup(key).map_or(KeyLocation::Standard, |entry| entry.location)
}

/// Whether the table knows this key.
#[must_use]
pub fn is_known(key: HostKey) -> bool {
    lookup(key).is_some()
}

/// Every host key the table maps, in keycode order.
pub fn known_keys() -> impl Iterator<Item = HostKey> {
    KEY_TABLE.iter().map(|entry| entry.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAC: KeyPlatform = KeyPlatform::MacOs;
    const WIN: KeyPlatform = KeyPlatform::Windows;

    fn ch(c: char) -> u16 {
        c as u16
    }

    #[test]
    fn table_is_strictly_sorted() {
        for pair in KEY_TABLE.windows(2) {
            assert!(
                pair[0].key < pair[1].key,
                "{:?} must sort before {:?}",
                pair[0].key,
                pair[1].key
            );
        }
    }

    #[test]
    fn digit_row_shifts_to_symbols() {
        let cases = [
            (HostKey::NUM_1, '1', '!'),
            (HostKey::NUM_9, '9', '('),
            (HostKey::NUM_0, '0', ')'),
            (HostKey::MINUS, '-', '_'),
            (HostKey::SEMICOLON, ';', ':'),
            (HostKey::APOSTROPHE, '\'', '"'),
            (HostKey::GRAVE, '`', '~'),
        ];
        for (key, plain, shifted) in cases {
            let off = translate(key, 0, ModifierState::NONE, MAC);
            let on = translate(key, 0, ModifierState::SHIFT, MAC);
            assert_eq!(off.character, ch(plain), "{key:?}");
            assert_eq!(on.character, ch(shifted), "{key:?}");
            assert_eq!(off.native_key, on.native_key);
            assert_eq!(off.virtual_key, on.virtual_key);
        }
    }

    #[test]
    fn letter_a_maps_to_vk_a() {
        let t = translate(HostKey::A, 4, ModifierState::NONE, WIN);
        assert_eq!(
            t,
            KeyTranslation {
                virtual_key: 0x41,
                native_key: 4,
                character: ch('a'),
            }
        );
        let mac = translate(HostKey::A, 4, ModifierState::NONE, MAC);
        assert_eq!(mac.native_key, 0x00);
    }

    #[test]
    fn caps_lock_and_shift_cancel_for_letters_only() {
        let caps = ModifierState::CAPS_LOCK;
        let both = ModifierState::CAPS_LOCK | ModifierState::SHIFT;
        assert_eq!(translate(HostKey::Q, 0, caps, MAC).character, ch('Q'));
        assert_eq!(translate(HostKey::Q, 0, both, MAC).character, ch('q'));
        // Caps lock leaves symbols alone.
        assert_eq!(translate(HostKey::NUM_1, 0, caps, MAC).character, ch('1'));
    }

    #[test]
    fn keypad_has_distinct_native_codes() {
        let main = translate(HostKey::PERIOD, 0, ModifierState::NONE, MAC);
        let pad = translate(HostKey::KP_PERIOD, 0, ModifierState::NONE, MAC);
        assert_eq!(main.character, pad.character);
        assert_ne!(main.native_key, pad.native_key);
        assert_ne!(main.virtual_key, pad.virtual_key);
        assert_eq!(key_location(HostKey::KP_PERIOD), KeyLocation::Keypad);

        // Keypad keys ignore shift.
        let shifted = translate(HostKey::KP_8, 0, ModifierState::SHIFT, MAC);
        assert_eq!(shifted.character, ch('8'));
    }

    #[test]
    fn backspace_aliases_mac_delete() {
        let bs = translate(HostKey::BACKSPACE, 42, ModifierState::NONE, MAC);
        assert_eq!(bs.native_key, 0x33);
        assert_eq!(bs.virtual_key, 0x08);
        assert_eq!(bs.character, 0x08);

        let fwd = translate(HostKey::DELETE, 76, ModifierState::NONE, MAC);
        assert_eq!(fwd.native_key, 0x75);
        assert_eq!(fwd.virtual_key, 0x2E);
        assert_eq!(fwd.character, 0);

        // Elsewhere the scancode is the native code.
        let win = translate(HostKey::BACKSPACE, 42, ModifierState::NONE, WIN);
        assert_eq!(win.native_key, 42);
    }

    #[test]
    fn return_and_keypad_enter() {
        let ret = translate(HostKey::RETURN, 0, ModifierState::NONE, MAC);
        let kp = translate(HostKey::KP_ENTER, 0, ModifierState::NONE, MAC);
        assert_eq!(ret.character, ch('\r'));
        assert_eq!(kp.character, ch('\r'));
        assert_eq!(ret.virtual_key, kp.virtual_key);
        assert_eq!(ret.native_key, 0x24);
        assert_eq!(kp.native_key, 0x4C);
    }

    #[test]
    fn function_and_media_keys_have_no_character() {
        for key in [
            HostKey::F1,
            HostKey::F12,
            HostKey::F17,
            HostKey::F20,
            HostKey::VOLUME_UP,
            HostKey::VOLUME_DOWN,
            HostKey::MUTE,
            HostKey::UP,
            HostKey::LSHIFT,
        ] {
            let t = translate(key, 0, ModifierState::SHIFT, MAC);
            assert_eq!(t.character, 0, "{key:?}");
            assert_ne!(t.native_key, 0, "{key:?}");
        }
        assert_eq!(translate(HostKey::F17, 0, ModifierState::NONE, MAC).native_key, 0x40);
        assert_eq!(translate(HostKey::F1, 0, ModifierState::NONE, WIN).virtual_key, 0x70);
    }

    #[test]
    fn keys_without_mac_code_fall_back_to_scancode() {
        let t = translate(HostKey::PRINT_SCREEN, 70, ModifierState::NONE, MAC);
        assert_eq!(t.native_key, 70);
        assert_eq!(t.virtual_key, 0x2C);
    }

    #[test]
    fn unknown_key_passes_through() {
        let key = HostKey(0x4000_0123);
        assert!(!is_known(key));
        let t = translate(key, 99, ModifierState::SHIFT, MAC);
        assert_eq!(t, KeyTranslation::passthrough(key, 99));
        assert_eq!(t.character, 0);
        assert_eq!(unmodified_character(key), 0);
    }

    #[test]
    fn authoritative_code_follows_platform() {
        let t = translate(HostKey::A, 4, ModifierState::NONE, MAC);
        assert_eq!(t.authoritative_code(MAC), 0x00);
        assert_eq!(t.authoritative_code(WIN), 0x41);
    }

    proptest! {
        #[test]
        fn shift_changes_only_character(idx in 0usize..KEY_TABLE.len(), bits in any::<u8>()) {
            let key = KEY_TABLE[idx].key;
            let base = ModifierState::from_bits_truncate(bits) - ModifierState::SHIFT;
            for platform in [MAC, WIN] {
                let off = translate(key, 7, base, platform);
                let on = translate(key, 7, base | ModifierState::SHIFT, platform);
                prop_assert_eq!(off.virtual_key, on.virtual_key);
                prop_assert_eq!(off.native_key, on.native_key);
            }
        }

        #[test]
        fn translation_is_deterministic(raw in any::<u32>(), scan in any::<u32>(), bits in any::<u8>()) {
            let key = HostKey(raw);
            let mods = ModifierState::from_bits_truncate(bits);
            prop_assert_eq!(translate(key, scan, mods, MAC), translate(key, scan, mods, MAC));
            prop_assert_eq!(translate(key, scan, mods, WIN), translate(key, scan, mods, WIN));
        }
    }
}
