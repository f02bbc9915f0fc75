#![forbid(unsafe_code)]

//! Edit commands and their keyboard shortcuts.
//!
//! | Chord | Command |
//! |-------|---------|
//! | primary+Z | Undo |
//! | primary+Shift+Z | Redo |
//! | primary+Y (not macOS) | Redo |
//! | primary+X / C / V | Cut / Copy / Paste |
//! | primary+A | Select All |
//! | forward delete (macOS) | Delete |
//!
//! The primary modifier is Command on macOS and Control elsewhere. Chords
//! that also hold Alt are left alone so AltGr input still reaches the page.

use osr_core::config::KeyPlatform;
use osr_core::event::{EngineKeyEvent, EventFlags};

/// macOS kVK code of the forward-delete key.
const MAC_FORWARD_DELETE: i32 = 0x75;

/// An editing operation applied to the focused document frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCommand {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    Delete,
    SelectAll,
}

impl EditCommand {
    pub const ALL: [Self; 7] = [
        Self::Undo,
        Self::Redo,
        Self::Cut,
        Self::Copy,
        Self::Paste,
        Self::Delete,
        Self::SelectAll,
    ];

    /// Context-menu command id.
    #[must_use]
    pub const fn command_id(self) -> i32 {
        match self {
            Self::Undo => 1001,
            Self::Redo => 1002,
            Self::Cut => 1003,
            Self::Copy => 1004,
            Self::Paste => 1005,
            Self::Delete => 1006,
            Self::SelectAll => 1007,
        }
    }

    #[must_use]
    pub fn from_command_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.command_id() == id)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Cut => "Cut",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::Delete => "Delete",
            Self::SelectAll => "Select All",
        }
    }

    /// Whether the command acts on the current selection.
    #[must_use]
    pub const fn needs_selection(self) -> bool {
        matches!(self, Self::Cut | Self::Copy | Self::Delete)
    }
}

/// How a recognised key event maps onto the engine's pre-key contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub command: EditCommand,
    /// Report the event as a keyboard shortcut (suppresses the engine's own
    /// accelerator handling).
    pub is_keyboard_shortcut: bool,
}

fn letter(event: &EngineKeyEvent) -> Option<u8> {
    let unmodified = u8::try_from(event.unmodified_character).ok();
    if let Some(c) = unmodified.filter(u8::is_ascii_alphabetic) {
        return Some(c.to_ascii_lowercase());
    }
    u8::try_from(event.windows_key_code)
        .ok()
        .filter(u8::is_ascii_uppercase)
        .map(|c| c.to_ascii_lowercase())
}

/// Recognise an edit shortcut in an engine key-down event.
#[must_use]
pub fn shortcut_command(event: &EngineKeyEvent, platform: KeyPlatform) -> Option<Shortcut> {
    if !event.kind.is_down() {
        return None;
    }

    if platform == KeyPlatform::MacOs && event.native_key_code == MAC_FORWARD_DELETE {
        return Some(Shortcut {
            command: EditCommand::Delete,
            is_keyboard_shortcut: false,
        });
    }

    let primary = match platform {
        KeyPlatform::MacOs => EventFlags::COMMAND_DOWN,
        KeyPlatform::Windows | KeyPlatform::Linux => EventFlags::CONTROL_DOWN,
    };
    if !event.has(primary) || event.has(EventFlags::ALT_DOWN) {
        return None;
    }
    let shift = event.has(EventFlags::SHIFT_DOWN);

    let command = match letter(event)? {
        b'z' if shift => EditCommand::Redo,
        b'z' => EditCommand::Undo,
        b'y' if platform != KeyPlatform::MacOs => EditCommand::Redo,
        b'x' => EditCommand::Cut,
        b'c' => EditCommand::Copy,
        b'v' => EditCommand::Paste,
        b'a' => EditCommand::SelectAll,
        _ => return None,
    };
    Some(Shortcut {
        command,
        is_keyboard_shortcut: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use osr_core::event::EngineKeyKind;

    fn key(vk: u8, flags: EventFlags) -> EngineKeyEvent {
        EngineKeyEvent {
            kind: EngineKeyKind::RawKeyDown,
            modifiers: flags,
            windows_key_code: i32::from(vk),
            unmodified_character: u16::from(vk.to_ascii_lowercase()),
            ..EngineKeyEvent::default()
        }
    }

    fn cmd(event: &EngineKeyEvent, platform: KeyPlatform) -> Option<EditCommand> {
        shortcut_command(event, platform).map(|s| s.command)
    }

    #[test]
    fn mac_uses_command() {
        let mac = KeyPlatform::MacOs;
        assert_eq!(cmd(&key(b'C', EventFlags::COMMAND_DOWN), mac), Some(EditCommand::Copy));
        assert_eq!(cmd(&key(b'C', EventFlags::CONTROL_DOWN), mac), None);
        assert_eq!(
            cmd(&key(b'Z', EventFlags::COMMAND_DOWN | EventFlags::SHIFT_DOWN), mac),
            Some(EditCommand::Redo)
        );
        assert_eq!(cmd(&key(b'Y', EventFlags::COMMAND_DOWN), mac), None);
    }

    #[test]
    fn windows_uses_control_and_ctrl_y() {
        let win = KeyPlatform::Windows;
        assert_eq!(cmd(&key(b'Z', EventFlags::CONTROL_DOWN), win), Some(EditCommand::Undo));
        assert_eq!(cmd(&key(b'Y', EventFlags::CONTROL_DOWN), win), Some(EditCommand::Redo));
        assert_eq!(cmd(&key(b'A', EventFlags::CONTROL_DOWN), win), Some(EditCommand::SelectAll));
        assert_eq!(cmd(&key(b'V', EventFlags::COMMAND_DOWN), win), None);
        assert_eq!(
            cmd(&key(b'V', EventFlags::CONTROL_DOWN | EventFlags::ALT_DOWN), win),
            None
        );
    }

    #[test]
    fn key_up_and_char_are_ignored() {
        let mut ev = key(b'X', EventFlags::COMMAND_DOWN);
        ev.kind = EngineKeyKind::KeyUp;
        assert_eq!(cmd(&ev, KeyPlatform::MacOs), None);
        ev.kind = EngineKeyKind::Char;
        assert_eq!(cmd(&ev, KeyPlatform::MacOs), None);
    }

    #[test]
    fn mac_forward_delete_is_not_a_keyboard_shortcut() {
        let ev = EngineKeyEvent {
            native_key_code: 0x75,
            ..EngineKeyEvent::default()
        };
        assert_eq!(
            shortcut_command(&ev, KeyPlatform::MacOs),
            Some(Shortcut {
                command: EditCommand::Delete,
                is_keyboard_shortcut: false,
            })
        );
        assert_eq!(shortcut_command(&ev, KeyPlatform::Linux), None);
    }

    #[test]
    fn command_ids_round_trip() {
        for command in EditCommand::ALL {
            assert_eq!(EditCommand::from_command_id(command.command_id()), Some(command));
        }
        assert_eq!(EditCommand::from_command_id(-1), None);
        assert_eq!(EditCommand::from_command_id(26500), None);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn any_platform() -> impl Strategy<Value = KeyPlatform> {
            prop_oneof![
                Just(KeyPlatform::MacOs),
                Just(KeyPlatform::Windows),
                Just(KeyPlatform::Linux),
            ]
        }

        proptest! {
            #[test]
            fn alt_chords_never_trigger(
                vk in any::<u8>(),
                bits in any::<u32>(),
                native in any::<i32>().prop_filter("forward delete", |n| *n != 0x75),
                platform in any_platform(),
            ) {
                let mut event = key(vk, EventFlags::from_bits_truncate(bits) | EventFlags::ALT_DOWN);
                event.native_key_code = native;
                prop_assert_eq!(shortcut_command(&event, platform), None);
            }

            #[test]
            fn releases_never_trigger(
                vk in any::<u8>(),
                bits in any::<u32>(),
                native in any::<i32>(),
                platform in any_platform(),
            ) {
                let mut event = key(vk, EventFlags::from_bits_truncate(bits));
                event.native_key_code = native;
                event.kind = EngineKeyKind::KeyUp;
                prop_assert_eq!(shortcut_command(&event, platform), None);
            }

            #[test]
            fn only_menu_range_maps_to_commands(id in any::<i32>()) {
                let known = (1001..=1007).contains(&id);
                prop_assert_eq!(EditCommand::from_command_id(id).is_some(), known);
            }
        }
    }
}
