#![forbid(unsafe_code)]

//! Modifier and repeat policy.
//!
//! Consulted before any key event is injected. The sets are closed: exactly
//! nine modifier keys and exactly four skip-key-up keys.

use osr_core::keys::HostKey;

const MODIFIER_KEYS: [HostKey; 9] = [
    HostKey::LSHIFT,
    HostKey::RSHIFT,
    HostKey::LCTRL,
    HostKey::RCTRL,
    HostKey::LALT,
    HostKey::RALT,
    HostKey::LGUI,
    HostKey::RGUI,
    HostKey::CAPS_LOCK,
];

const SKIP_KEY_UP: [HostKey; 4] = [HostKey::LEFT, HostKey::RIGHT, HostKey::UP, HostKey::DOWN];

/// Whether the key is a modifier. Modifier key-downs never produce a
/// character event.
#[must_use]
pub fn is_modifier_key(key: HostKey) -> bool {
    MODIFIER_KEYS.contains(&key)
}

/// Whether the key-up of this key must not be forwarded.
///
/// The engine treats a forwarded arrow key-up as a second navigation step.
#[must_use]
pub fn should_skip_key_up(key: HostKey) -> bool {
    SKIP_KEY_UP.contains(&key)
}

/// Whether an auto-repeated key-down should be dropped.
#[must_use]
pub fn should_suppress_repeat(key: HostKey, repeat: bool) -> bool {
    repeat && is_modifier_key(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::known_keys;

    #[test]
    fn exactly_nine_modifier_keys() {
        let count = known_keys().filter(|k| is_modifier_key(*k)).count();
        assert_eq!(count, 9);
        assert!(is_modifier_key(HostKey::CAPS_LOCK));
        assert!(is_modifier_key(HostKey::RGUI));
        assert!(!is_modifier_key(HostKey::A));
        assert!(!is_modifier_key(HostKey::NUM_LOCK_CLEAR));
    }

    #[test]
    fn exactly_four_skip_key_up_keys() {
        let count = known_keys().filter(|k| should_skip_key_up(*k)).count();
        assert_eq!(count, 4);
        assert!(should_skip_key_up(HostKey::LEFT));
        assert!(!should_skip_key_up(HostKey::HOME));
        assert!(!should_skip_key_up(HostKey::KP_8));
    }

    #[test]
    fn only_modifier_repeats_are_suppressed() {
        assert!(should_suppress_repeat(HostKey::LSHIFT, true));
        assert!(!should_suppress_repeat(HostKey::LSHIFT, false));
        assert!(!should_suppress_repeat(HostKey::A, true));
        assert!(!should_suppress_repeat(HostKey::BACKSPACE, true));
    }
}
