#![forbid(unsafe_code)]

//! Capability traits at the engine boundary.
//!
//! Outbound (we call the engine):
//! - [`BrowserHost`]: input injection, IME, frame pump, resize, close.
//! - [`DocumentFrame`]: edit commands on the focused frame.
//!
//! Inbound (the engine calls us, on its own thread):
//! - [`PaintSink`]: view queries, paints, popup, selection, cursor.
//! - [`InputSink`]: key pre/post dispatch, focus, context menu.
//! - [`LifecycleSink`]: created / close / before-close.
//!
//! An engine adapter holds one `Arc<Session>` and forwards each callback to
//! the matching trait; [`crate::Session`] implements all three sinks.
//! None of the inbound methods can fail.

use std::sync::Arc;

use osr_core::event::{EngineKeyEvent, EngineMouseEvent, MouseButton};
use osr_core::geometry::{Rect, ScreenInfo};
use osr_frame::{PaintElement, SharedSurfaceHandle};
use osr_input::{CompositionUnderline, Utf16Range};

use crate::context_menu::ContextMenuParams;
use crate::cursor::CursorType;
use crate::edit::EditCommand;

/// A document frame inside the browser.
pub trait DocumentFrame: Send + Sync {
    fn execute(&self, command: EditCommand);
}

/// The engine's per-browser control surface.
pub trait BrowserHost: Send + Sync {
    /// Whether the browser is still usable.
    fn is_valid(&self) -> bool;
    /// Whether the browser renders off-screen.
    fn is_windowless(&self) -> bool;
    fn focused_frame(&self) -> Option<Arc<dyn DocumentFrame>>;

    fn send_key_event(&self, event: &EngineKeyEvent);
    fn send_mouse_move(&self, event: &EngineMouseEvent, leave: bool);
    fn send_mouse_click(
        &self,
        event: &EngineMouseEvent,
        button: MouseButton,
        mouse_up: bool,
        click_count: u32,
    );
    fn send_mouse_wheel(&self, event: &EngineMouseEvent, delta_x: i32, delta_y: i32);
    fn set_focus(&self, focused: bool);

    fn ime_set_composition(
        &self,
        text: &str,
        underlines: &[CompositionUnderline],
        replacement_range: Utf16Range,
        selection_range: Utf16Range,
    );
    fn ime_commit_text(&self, text: &str, replacement_range: Utf16Range, relative_cursor_position: i32);
    fn ime_finish_composing_text(&self, keep_selection: bool);
    fn ime_cancel_composition(&self);

    /// Ask the engine to produce a frame now.
    fn send_external_begin_frame(&self);
    /// The view size changed; the engine will query `view_rect` again.
    fn was_resized(&self);
    /// The device scale factor changed.
    fn notify_screen_info_changed(&self);
    /// Start an asynchronous close. Completion is signalled through
    /// [`LifecycleSink::on_before_close`].
    fn close_browser(&self, force: bool);
}

/// Answer to the engine's pre-dispatch key callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PreKeyOutcome {
    /// Stop the engine's default handling.
    pub handled: bool,
    pub is_keyboard_shortcut: bool,
}

pub trait PaintSink: Send + Sync {
    /// Synchronous; must answer the current size immediately.
    fn view_rect(&self) -> Rect;
    fn screen_info(&self) -> ScreenInfo;

    /// `buffer` is only valid for the duration of the call.
    fn on_paint(
        &self,
        element: PaintElement,
        dirty_rects: &[Rect],
        buffer: &[u8],
        width: u32,
        height: u32,
    );
    fn on_accelerated_paint(
        &self,
        element: PaintElement,
        dirty_rects: &[Rect],
        handle: SharedSurfaceHandle,
        width: u32,
        height: u32,
    );
    fn on_popup_show(&self, visible: bool);
    fn on_popup_size(&self, rect: Rect);
    fn on_text_selection_changed(&self, selected_text: &str, range: Utf16Range);
    fn on_composition_range_changed(&self, range: Utf16Range, character_bounds: &[Rect]);
    /// Returns `true` when the host took over cursor display.
    fn on_cursor_change(&self, cursor: CursorType) -> bool;
}

pub trait InputSink: Send + Sync {
    fn on_pre_key_event(&self, event: &EngineKeyEvent) -> PreKeyOutcome;
    /// Post-dispatch. Returns `true` if the event counts as handled.
    fn on_key_event(&self, event: &EngineKeyEvent) -> bool;
    fn on_got_focus(&self);
    fn on_take_focus(&self, next: bool);
    /// Returns `true` if the engine's own menu model should be cleared.
    fn on_before_context_menu(&self, params: &ContextMenuParams) -> bool;
    fn on_context_menu_command(&self, command_id: i32) -> bool;
}

pub trait LifecycleSink: Send + Sync {
    fn on_after_created(&self, host: Arc<dyn BrowserHost>);
    /// Returns `true` to cancel the close.
    fn do_close(&self) -> bool;
    fn on_before_close(&self);
}
