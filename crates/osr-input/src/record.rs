#![forbid(unsafe_code)]

//! Host input record/replay.
//!
//! [`HostInput`] is the union of everything the host feeds a session.
//! [`HostInputRecord`] is its JSON encoding: a `kind` tag plus the fields
//! needed for replay. One record per line gives a JSONL trace that
//! [`InputRecorder::parse_jsonl`] reads back.

use serde::{Deserialize, Serialize};

use osr_core::event::{HostKeyEvent, HostMouseEvent, ModifierState, MouseButton};
use osr_core::geometry::{Point, ViewGeometry};
use osr_core::keys::HostKey;

use crate::ime::{CompositionUpdate, Utf16Range};

/// One host input, in the order the host delivered it.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    Key(HostKeyEvent),
    Mouse(HostMouseEvent),
    Composition(CompositionUpdate),
    Commit(String),
    CancelComposition,
    Focus(bool),
    Resize(ViewGeometry),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordedButton {
    Left,
    Middle,
    Right,
}

impl From<MouseButton> for RecordedButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::Left,
            MouseButton::Middle => Self::Middle,
            MouseButton::Right => Self::Right,
        }
    }
}

impl From<RecordedButton> for MouseButton {
    fn from(button: RecordedButton) -> Self {
        match button {
            RecordedButton::Left => Self::Left,
            RecordedButton::Middle => Self::Middle,
            RecordedButton::Right => Self::Right,
        }
    }
}

/// JSON encoding of [`HostInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostInputRecord {
    Key {
        key: u32,
        scan_code: u32,
        mods: u8,
        pressed: bool,
        #[serde(default)]
        repeat: bool,
    },
    MouseMove {
        x: i32,
        y: i32,
        mods: u8,
        #[serde(default)]
        leave: bool,
    },
    MouseButton {
        x: i32,
        y: i32,
        button: RecordedButton,
        pressed: bool,
        click_count: u32,
        mods: u8,
    },
    Wheel {
        x: i32,
        y: i32,
        dx: f32,
        dy: f32,
        mods: u8,
    },
    Composition {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selection: Option<(u32, u32)>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replacement: Option<(u32, u32)>,
    },
    Commit {
        text: String,
    },
    CancelComposition,
    Focus {
        focused: bool,
    },
    Resize {
        width: u32,
        height: u32,
        pixel_density: f32,
    },
}

fn range_to_pair(range: Utf16Range) -> Option<(u32, u32)> {
    range.is_valid().then_some((range.start, range.end))
}

fn pair_to_range(pair: Option<(u32, u32)>) -> Utf16Range {
    pair.map_or(Utf16Range::INVALID, |(start, end)| Utf16Range::new(start, end))
}

impl From<&HostInput> for HostInputRecord {
    fn from(value: &HostInput) -> Self {
        match value {
            HostInput::Key(key) => Self::Key {
                key: key.key.raw(),
                scan_code: key.scan_code,
                mods: key.modifiers.bits(),
                pressed: key.pressed,
                repeat: key.repeat,
            },
            HostInput::Mouse(HostMouseEvent::Move {
                position,
                modifiers,
                leave,
            }) => Self::MouseMove {
                x: position.x,
                y: position.y,
                mods: modifiers.bits(),
                leave: *leave,
            },
            HostInput::Mouse(HostMouseEvent::Button {
                position,
                button,
                pressed,
                click_count,
                modifiers,
            }) => Self::MouseButton {
                x: position.x,
                y: position.y,
                button: (*button).into(),
                pressed: *pressed,
                click_count: *click_count,
                mods: modifiers.bits(),
            },
            HostInput::Mouse(HostMouseEvent::Wheel {
                position,
                delta_x,
                delta_y,
                modifiers,
            }) => Self::Wheel {
                x: position.x,
                y: position.y,
                dx: *delta_x,
                dy: *delta_y,
                mods: modifiers.bits(),
            },
            HostInput::Composition(update) => Self::Composition {
                text: update.marked_text.clone(),
                selection: range_to_pair(update.selected_range),
                replacement: range_to_pair(update.marked_range),
            },
            HostInput::Commit(text) => Self::Commit { text: text.clone() },
            HostInput::CancelComposition => Self::CancelComposition,
            HostInput::Focus(focused) => Self::Focus { focused: *focused },
            HostInput::Resize(view) => Self::Resize {
                width: view.width,
                height: view.height,
                pixel_density: view.pixel_density,
            },
        }
    }
}

impl From<HostInputRecord> for HostInput {
    fn from(value: HostInputRecord) -> Self {
        let mods = ModifierState::from_bits_truncate;
        match value {
            HostInputRecord::Key {
                key,
                scan_code,
                mods: bits,
                pressed,
                repeat,
            } => Self::Key(HostKeyEvent {
                key: HostKey(key),
                scan_code,
                modifiers: mods(bits),
                pressed,
                repeat,
            }),
            HostInputRecord::MouseMove {
                x,
                y,
                mods: bits,
                leave,
            } => Self::Mouse(HostMouseEvent::Move {
                position: Point::new(x, y),
                modifiers: mods(bits),
                leave,
            }),
            HostInputRecord::MouseButton {
                x,
                y,
                button,
                pressed,
                click_count,
                mods: bits,
            } => Self::Mouse(HostMouseEvent::Button {
                position: Point::new(x, y),
                button: button.into(),
                pressed,
                click_count,
                modifiers: mods(bits),
            }),
            HostInputRecord::Wheel {
                x,
                y,
                dx,
                dy,
                mods: bits,
            } => Self::Mouse(HostMouseEvent::Wheel {
                position: Point::new(x, y),
                delta_x: dx,
                delta_y: dy,
                modifiers: mods(bits),
            }),
            HostInputRecord::Composition {
                text,
                selection,
                replacement,
            } => Self::Composition(CompositionUpdate {
                marked_text: text,
                marked_range: pair_to_range(replacement),
                selected_range: pair_to_range(selection),
                cursor_point: None,
            }),
            HostInputRecord::Commit { text } => Self::Commit(text),
            HostInputRecord::CancelComposition => Self::CancelComposition,
            HostInputRecord::Focus { focused } => Self::Focus(focused),
            HostInputRecord::Resize {
                width,
                height,
                pixel_density,
            } => Self::Resize(ViewGeometry::new(width, height, pixel_density)),
        }
    }
}

impl HostInput {
    /// Encode as one JSON line.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&HostInputRecord::from(self))
    }

    /// Decode one JSON line.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let record: HostInputRecord = serde_json::from_str(s)?;
        Ok(Self::from(record))
    }
}

/// Accumulates host input for later replay.
#[derive(Debug, Clone, Default)]
pub struct InputRecorder {
    inputs: Vec<HostInput>,
}

impl InputRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, input: HostInput) {
        self.inputs.push(input);
    }

    #[must_use]
    pub fn inputs(&self) -> &[HostInput] {
        &self.inputs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// One JSON object per line, trailing newline included.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for input in &self.inputs {
            out.push_str(&input.to_json_string()?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse a JSONL trace. Blank lines are skipped.
    pub fn parse_jsonl(text: &str) -> Result<Vec<HostInput>, serde_json::Error> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(HostInput::from_json_str)
            .collect()
    }
}
