#![forbid(unsafe_code)]

//! IME composition bridge.
//!
//! Tracks the provisional (marked) text of one focused target and turns
//! host text-input notifications into engine IME calls.
//!
//! # State Machine
//!
//! ```text
//!            update(non-empty)                 update(non-empty)
//!   Idle ─────────────────────────► Composing ◄──────────────┐
//!    ▲                                  │  │                 │
//!    │   commit / cancel / finish       │  └─────────────────┘
//!    └──────────────────────────────────┘
//! ```
//!
//! - `begin` while Composing cancels the old composition first.
//! - An update with empty marked text while Composing is a cancel.
//! - `finish_composing` is valid from either state.
//!
//! Every operation returns the engine calls to make, in order. The bridge
//! itself never talks to the engine.
//!
//! All ranges are UTF-16 code unit ranges, matching the engine.

use smallvec::SmallVec;
use tracing::debug;

use osr_core::geometry::{Point, Rect};

/// Half-open range of UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Utf16Range {
    pub start: u32,
    pub end: u32,
}

impl Utf16Range {
    /// "No range" marker understood by the engine.
    pub const INVALID: Self = Self {
        start: u32::MAX,
        end: u32::MAX,
    };

    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Collapsed range (caret) at `pos`.
    #[must_use]
    pub const fn caret(pos: u32) -> Self {
        Self::new(pos, pos)
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start != u32::MAX && self.end != u32::MAX && self.start <= self.end
    }

    #[must_use]
    pub const fn len(&self) -> u32 {
        if self.is_valid() { self.end - self.start } else { 0 }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clip into `0..=limit`. Invalid ranges stay invalid.
    #[must_use]
    pub fn clamp_to(self, limit: u32) -> Self {
        if !self.is_valid() {
            return self;
        }
        Self::new(self.start.min(limit), self.end.min(limit))
    }
}

impl Default for Utf16Range {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Length of `text` in UTF-16 code units.
#[must_use]
pub fn utf16_len(text: &str) -> u32 {
    u32::try_from(text.encode_utf16().count()).unwrap_or(u32::MAX)
}

/// A composition update from the host's text-input system.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositionUpdate {
    pub marked_text: String,
    /// Document range the marked text replaces.
    pub marked_range: Utf16Range,
    /// Selection inside the marked text.
    pub selected_range: Utf16Range,
    /// Caret position reported by the host, view coordinates.
    pub cursor_point: Option<Point>,
}

impl CompositionUpdate {
    #[must_use]
    pub fn new(marked_text: impl Into<String>) -> Self {
        Self {
            marked_text: marked_text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_selection(mut self, range: Utf16Range) -> Self {
        self.selected_range = range;
        self
    }

    #[must_use]
    pub fn with_replacement(mut self, range: Utf16Range) -> Self {
        self.marked_range = range;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, point: Point) -> Self {
        self.cursor_point = Some(point);
        self
    }
}

/// Underline decoration for part of the marked text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositionUnderline {
    pub range: Utf16Range,
    pub thick: bool,
}

/// An IME call to make on the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImeCall {
    SetComposition {
        text: String,
        underlines: Vec<CompositionUnderline>,
        replacement_range: Utf16Range,
        selection_range: Utf16Range,
    },
    CommitText {
        text: String,
        replacement_range: Utf16Range,
        relative_cursor_position: i32,
    },
    FinishComposingText {
        keep_selection: bool,
    },
    CancelComposition,
}

/// Engine calls produced by one bridge operation.
pub type ImeCalls = SmallVec<[ImeCall; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositionPhase {
    #[default]
    Idle,
    Composing,
}

/// Current composition of the focused target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositionState {
    pub marked_text: String,
    pub marked_range: Utf16Range,
    pub selected_range: Utf16Range,
    pub cursor_anchor: Option<Point>,
}

impl CompositionState {
    #[must_use]
    pub fn phase(&self) -> CompositionPhase {
        if self.marked_text.is_empty() {
            CompositionPhase::Idle
        } else {
            CompositionPhase::Composing
        }
    }

    fn clear(&mut self) {
        self.marked_text.clear();
        self.marked_range = Utf16Range::INVALID;
        self.selected_range = Utf16Range::INVALID;
    }
}

/// Where the IME candidate window should sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImeAnchor {
    pub caret: Point,
    pub pointer: Point,
    /// Track the pointer instead of the caret.
    pub follow_mouse: bool,
}

impl ImeAnchor {
    #[must_use]
    pub const fn candidate_anchor(&self) -> Point {
        if self.follow_mouse {
            self.pointer
        } else {
            self.caret
        }
    }
}

/// Composition state machine for one focused target.
#[derive(Debug, Clone, Default)]
pub struct ImeBridge {
    state: CompositionState,
    anchor: ImeAnchor,
}

impl ImeBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> CompositionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    #[must_use]
    pub const fn anchor(&self) -> ImeAnchor {
        self.anchor
    }

    /// Start a new composition, cancelling any composition in progress.
    pub fn begin(&mut self, update: CompositionUpdate) -> ImeCalls {
        let mut calls = ImeCalls::new();
        if self.phase() == CompositionPhase::Composing {
            debug!(target: "osr::input", "composition restarted; cancelling previous");
            self.state.clear();
            calls.push(ImeCall::CancelComposition);
        }
        calls.extend(self.update(update));
        calls
    }

    /// Apply a marked-text update.
    pub fn update(&mut self, update: CompositionUpdate) -> ImeCalls {
        let mut calls = ImeCalls::new();
        if let Some(point) = update.cursor_point {
            self.anchor.caret = point;
            self.state.cursor_anchor = Some(point);
        }

        if update.marked_text.is_empty() {
            if self.phase() == CompositionPhase::Composing {
                debug!(target: "osr::input", "empty marked text; composition cancelled");
                self.state.clear();
                calls.push(ImeCall::CancelComposition);
            }
            return calls;
        }

        if self.phase() == CompositionPhase::Idle {
            debug!(target: "osr::input", "composition started");
        }
        let text_len = utf16_len(&update.marked_text);
        let selection = if update.selected_range.is_valid() {
            update.selected_range.clamp_to(text_len)
        } else {
            Utf16Range::caret(text_len)
        };

        let mut underlines = vec![CompositionUnderline {
            range: Utf16Range::new(0, text_len),
            thick: false,
        }];
        if !selection.is_empty() {
            underlines.push(CompositionUnderline {
                range: selection,
                thick: true,
            });
        }

        self.state.marked_text.clone_from(&update.marked_text);
        self.state.marked_range = update.marked_range;
        self.state.selected_range = selection;

        calls.push(ImeCall::SetComposition {
            text: update.marked_text,
            underlines,
            replacement_range: update.marked_range,
            selection_range: selection,
        });
        calls
    }

    /// Commit final text. Valid from Idle too (plain inserted text).
    pub fn commit(
        &mut self,
        text: impl Into<String>,
        replacement_range: Utf16Range,
        relative_cursor_position: i32,
    ) -> ImeCalls {
        let text = text.into();
        if self.phase() == CompositionPhase::Composing {
            debug!(target: "osr::input", "composition committed");
        }
        self.state.clear();
        let mut calls = ImeCalls::new();
        calls.push(ImeCall::CommitText {
            text,
            replacement_range,
            relative_cursor_position,
        });
        calls
    }

    /// Abandon the composition. No-op when Idle.
    pub fn cancel(&mut self) -> ImeCalls {
        let mut calls = ImeCalls::new();
        if self.phase() == CompositionPhase::Composing {
            debug!(target: "osr::input", "composition cancelled");
            self.state.clear();
            calls.push(ImeCall::CancelComposition);
        }
        calls
    }

    /// Finish composing, keeping or discarding the marked text.
    pub fn finish_composing(&mut self, keep_selection: bool) -> ImeCalls {
        self.state.clear();
        let mut calls = ImeCalls::new();
        calls.push(ImeCall::FinishComposingText { keep_selection });
        calls
    }

    /// Focus change. Both directions reset to an empty composition; losing
    /// focus mid-composition cancels it.
    pub fn handle_focus(&mut self, focused: bool) -> ImeCalls {
        let calls = if focused { ImeCalls::new() } else { self.cancel() };
        self.state = CompositionState::default();
        calls
    }

    pub fn set_follow_mouse(&mut self, follow: bool) {
        self.anchor.follow_mouse = follow;
    }

    pub fn toggle_follow_mouse(&mut self) -> bool {
        self.anchor.follow_mouse = !self.anchor.follow_mouse;
        self.anchor.follow_mouse
    }

    pub fn set_pointer(&mut self, point: Point) {
        self.anchor.pointer = point;
    }

    /// Anchor point for the candidate window.
    #[must_use]
    pub const fn candidate_anchor(&self) -> Point {
        self.anchor.candidate_anchor()
    }

    /// Engine report of the composition's character bounds. The caret moves
    /// to the bottom-left of the last character.
    pub fn on_composition_range_changed(&mut self, range: Utf16Range, bounds: &[Rect]) {
        let Some(last) = bounds.last() else {
            return;
        };
        let caret = Point::new(last.x, last.bottom());
        self.anchor.caret = caret;
        self.state.cursor_anchor = Some(caret);
        if self.phase() == CompositionPhase::Composing && range.is_valid() {
            self.state.marked_range = range;
        }
    }
}
