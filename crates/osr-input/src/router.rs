#![forbid(unsafe_code)]

//! Key routing: one host key event → zero, one or two engine key events.
//!
//! | Host event | Engine events |
//! |------------|---------------|
//! | key-down, text key | `RawKeyDown`, `Char` |
//! | key-down, non-text key / shortcut chord | `RawKeyDown` |
//! | repeated modifier key-down | nothing |
//! | key-up | `KeyUp` |
//! | arrow key-up | nothing |
//!
//! A `Char` is withheld while CONTROL or COMMAND is held so that chords
//! such as Cmd+C never insert text.

use smallvec::SmallVec;
use tracing::trace;

use osr_core::config::KeyPlatform;
use osr_core::event::{EngineKeyEvent, EngineKeyKind, EventFlags, HostKeyEvent, ModifierState};

use crate::keymap::{self, KeyLocation};
use crate::policy::{is_modifier_key, should_skip_key_up, should_suppress_repeat};

/// Engine events produced by one host key event.
pub type RoutedKeys = SmallVec<[EngineKeyEvent; 2]>;

fn location_flag(location: KeyLocation) -> EventFlags {
    match location {
        KeyLocation::Standard => EventFlags::NONE,
        KeyLocation::Left => EventFlags::IS_LEFT,
        KeyLocation::Right => EventFlags::IS_RIGHT,
        KeyLocation::Keypad => EventFlags::IS_KEY_PAD,
    }
}

/// Translate a host key event into the engine events to inject, in order.
#[must_use]
pub fn route_key(event: &HostKeyEvent, platform: KeyPlatform) -> RoutedKeys {
    let mut out = RoutedKeys::new();

    if event.pressed && should_suppress_repeat(event.key, event.repeat) {
        trace!(target: "osr::input", key = event.key.raw(), "modifier repeat dropped");
        return out;
    }
    if !event.pressed && should_skip_key_up(event.key) {
        trace!(target: "osr::input", key = event.key.raw(), "key-up skipped");
        return out;
    }

    let translation = keymap::translate(event.key, event.scan_code, event.modifiers, platform);
    let mut flags =
        event.modifiers.to_event_flags() | location_flag(keymap::key_location(event.key));
    if event.pressed && event.repeat {
        flags |= EventFlags::IS_REPEAT;
    }

    let base = EngineKeyEvent {
        kind: if event.pressed {
            EngineKeyKind::RawKeyDown
        } else {
            EngineKeyKind::KeyUp
        },
        modifiers: flags,
        windows_key_code: translation.virtual_key,
        native_key_code: translation.native_key,
        is_system_key: platform == KeyPlatform::Windows
            && event.modifiers.contains(ModifierState::ALT),
        character: translation.character,
        unmodified_character: keymap::unmodified_character(event.key),
        focus_on_editable_field: false,
    };
    out.push(base);

    let chord = event
        .modifiers
        .intersects(ModifierState::CONTROL | ModifierState::COMMAND);
    if event.pressed && translation.character != 0 && !is_modifier_key(event.key) && !chord {
        out.push(EngineKeyEvent {
            kind: EngineKeyKind::Char,
            ..base
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use osr_core::keys::HostKey;
    use pretty_assertions::assert_eq;

    const MAC: KeyPlatform = KeyPlatform::MacOs;

    fn kinds(events: &RoutedKeys) -> Vec<EngineKeyKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn forward_delete_emits_raw_key_down_only() {
        for platform in [MAC, KeyPlatform::Windows, KeyPlatform::Linux] {
            let out = route_key(&HostKeyEvent::down(HostKey::DELETE), platform);
            assert_eq!(kinds(&out), vec![EngineKeyKind::RawKeyDown]);
            assert_eq!(out[0].character, 0);
        }
    }

    #[test]
    fn text_key_down_emits_raw_and_char() {
        let ev = HostKeyEvent::down(HostKey::NUM_9).with_modifiers(ModifierState::SHIFT);
        let out = route_key(&ev, MAC);
        assert_eq!(kinds(&out), vec![EngineKeyKind::RawKeyDown, EngineKeyKind::Char]);
        assert_eq!(out[1].character, u16::from(b'('));
        assert_eq!(out[1].unmodified_character, u16::from(b'9'));
        assert!(out[1].has(EventFlags::SHIFT_DOWN));
    }

    #[test]
    fn command_chord_has_no_char() {
        let ev = HostKeyEvent::down(HostKey::C).with_modifiers(ModifierState::COMMAND);
        let out = route_key(&ev, MAC);
        assert_eq!(kinds(&out), vec![EngineKeyKind::RawKeyDown]);
        assert!(out[0].has(EventFlags::COMMAND_DOWN));
    }

    #[test]
    fn arrow_key_up_is_skipped() {
        assert!(route_key(&HostKeyEvent::up(HostKey::LEFT), MAC).is_empty());
        let down = route_key(&HostKeyEvent::down(HostKey::LEFT), MAC);
        assert_eq!(kinds(&down), vec![EngineKeyKind::RawKeyDown]);
        assert_eq!(down[0].native_key_code, 0x7B);
    }

    #[test]
    fn key_up_emits_single_event() {
        let out = route_key(&HostKeyEvent::up(HostKey::A), MAC);
        assert_eq!(kinds(&out), vec![EngineKeyKind::KeyUp]);
    }

    #[test]
    fn modifier_keys_never_emit_char_and_repeats_drop() {
        let down = route_key(&HostKeyEvent::down(HostKey::LSHIFT), MAC);
        assert_eq!(kinds(&down), vec![EngineKeyKind::RawKeyDown]);
        assert!(down[0].has(EventFlags::IS_LEFT));

        let repeat = HostKeyEvent::down(HostKey::LSHIFT).repeated();
        assert!(route_key(&repeat, MAC).is_empty());
    }

    #[test]
    fn repeated_text_key_is_flagged() {
        let out = route_key(&HostKeyEvent::down(HostKey::A).repeated(), MAC);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.has(EventFlags::IS_REPEAT)));
    }

    #[test]
    fn keypad_flag_and_system_key() {
        let out = route_key(&HostKeyEvent::down(HostKey::KP_5), MAC);
        assert!(out[0].has(EventFlags::IS_KEY_PAD));
        assert!(!out[0].is_system_key);

        let alt = HostKeyEvent::down(HostKey::F).with_modifiers(ModifierState::ALT);
        let win = route_key(&alt, KeyPlatform::Windows);
        assert!(win[0].is_system_key);
        assert!(!route_key(&alt, MAC)[0].is_system_key);
    }
}
