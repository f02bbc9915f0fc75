#![forbid(unsafe_code)]

//! The session context object.
//!
//! One [`Session`] per browser. It owns everything the bridge knows about
//! that browser and is shared through `Arc` between the host (input,
//! rendering) and the engine adapter (callbacks).
//!
//! # Lifecycle
//!
//! ```text
//! Creating ──on_after_created──► Open ──request_close──► Closing ──on_before_close──► Closed
//!     │                                                      ▲
//!     └────────────────request_close─────────────────────────┘
//! ```
//!
//! Closing is asynchronous. Callbacks keep arriving until
//! `on_before_close`; they are handled normally. After `Closed` the engine
//! handle is dropped and every injection is a logged no-op.
//!
//! # Shared state
//!
//! | Field | Written by | Read by | Guard |
//! |-------|-----------|---------|-------|
//! | engine handle | lifecycle callbacks | everything | `ArcSwapOption` |
//! | frames, popup, view | paint callbacks / resize | renderer | [`FrameBridge`] |
//! | composition | host IME + engine range callback | host | `Mutex` |
//! | held mouse buttons | host | host | `Mutex` |
//! | focus, state | callbacks | host | atomics |
//! | selection text | engine | context menu | `Mutex` |
//! | pending context menu | engine | host | `Mutex` |
//! | cursor | engine | renderer | atomic |

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;
use tracing::{debug, info, trace, warn};

use osr_core::config::{BridgeConfig, ShortcutStage};
use osr_core::event::{EngineKeyEvent, HostKeyEvent, HostMouseEvent};
use osr_core::geometry::{Point, Rect, ScreenInfo, ViewGeometry};
use osr_frame::{CompositePlan, FrameBridge, FrameReader, PaintElement, SharedSurfaceHandle};
use osr_input::record::HostInput;
use osr_input::{
    CompositionPhase, CompositionUpdate, EngineMouseInput, ImeBridge, ImeCall, ImeCalls,
    MouseTranslator, Utf16Range, route_key,
};

use crate::context_menu::{ContextMenu, ContextMenuParams};
use crate::cursor::{CursorCell, CursorType, HostCursor};
use crate::edit::{EditCommand, shortcut_command};
use crate::sinks::{BrowserHost, InputSink, LifecycleSink, PaintSink, PreKeyOutcome};

/// Identifier of a session inside a [`crate::SessionRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SessionState {
    /// Waiting for the engine to create the browser.
    Creating = 0,
    Open = 1,
    /// Close requested, waiting for `on_before_close`.
    Closing = 2,
    Closed = 3,
}

impl SessionState {
    const fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Creating,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// `ArcSwapOption` needs a sized pointee.
struct HostRef(Arc<dyn BrowserHost>);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Session {
    id: SessionId,
    config: BridgeConfig,
    state: AtomicU8,
    host: ArcSwapOption<HostRef>,
    frames: FrameBridge,
    ime: Mutex<ImeBridge>,
    mouse: Mutex<MouseTranslator>,
    focused: AtomicBool,
    selection: Mutex<String>,
    context_menu: Mutex<Option<ContextMenu>>,
    cursor: CursorCell,
}

impl Session {
    /// Create a session waiting for its browser. The config is clamped with
    /// [`BridgeConfig::validated`].
    #[must_use]
    pub fn new(id: SessionId, config: BridgeConfig) -> Self {
        let config = config.validated();
        Self {
            id,
            frames: FrameBridge::new(config.initial_view, config.accelerated_paint),
            mouse: Mutex::new(MouseTranslator::new(config.wheel_scale)),
            config,
            state: AtomicU8::new(SessionState::Creating as u8),
            host: ArcSwapOption::empty(),
            ime: Mutex::new(ImeBridge::new()),
            focused: AtomicBool::new(false),
            selection: Mutex::new(String::new()),
            context_menu: Mutex::new(None),
            cursor: CursorCell::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// The engine handle, if the browser exists and is still valid.
    fn live_host(&self) -> Option<Arc<dyn BrowserHost>> {
        let host = self.host.load_full()?;
        host.0.is_valid().then(|| Arc::clone(&host.0))
    }

    fn live_host_or_log(&self, what: &'static str) -> Option<Arc<dyn BrowserHost>> {
        let host = self.live_host();
        if host.is_none() {
            debug!(
                target: "osr::input",
                session = %self.id,
                state = ?self.state(),
                what,
                "dropped: no valid browser"
            );
        }
        host
    }

    // ── host → engine: input ────────────────────────────────────────────

    /// Route and inject one host key event. Returns the number of engine
    /// events sent.
    pub fn handle_key(&self, event: &HostKeyEvent) -> usize {
        let routed = route_key(event, self.config.key_platform);
        if routed.is_empty() {
            return 0;
        }
        let Some(host) = self.live_host_or_log("key") else {
            return 0;
        };
        for engine_event in &routed {
            host.send_key_event(engine_event);
        }
        routed.len()
    }

    /// Translate and inject one host mouse event. A button press pulls
    /// engine focus into the view before the click is sent.
    pub fn handle_mouse(&self, event: &HostMouseEvent) {
        let input = lock(&self.mouse).translate(event);
        lock(&self.ime).set_pointer(event.position());
        let Some(host) = self.live_host_or_log("mouse") else {
            return;
        };
        match input {
            EngineMouseInput::Move { event, leave } => host.send_mouse_move(&event, leave),
            EngineMouseInput::Click {
                event,
                button,
                mouse_up,
                click_count,
            } => {
                if !mouse_up {
                    host.set_focus(true);
                }
                host.send_mouse_click(&event, button, mouse_up, click_count);
            }
            EngineMouseInput::Wheel {
                event,
                delta_x,
                delta_y,
            } => host.send_mouse_wheel(&event, delta_x, delta_y),
        }
    }

    /// Host window focus gained or lost.
    pub fn handle_focus(&self, focused: bool) {
        lock(&self.mouse).handle_focus(focused);
        let calls = lock(&self.ime).handle_focus(focused);
        if let Some(host) = self.live_host_or_log("focus") {
            self.forward_ime(&host, calls);
            host.set_focus(focused);
        }
    }

    // ── host → engine: IME ──────────────────────────────────────────────

    fn forward_ime(&self, host: &Arc<dyn BrowserHost>, calls: ImeCalls) {
        for call in calls {
            trace!(target: "osr::input", session = %self.id, ?call, "ime");
            match call {
                ImeCall::SetComposition {
                    text,
                    underlines,
                    replacement_range,
                    selection_range,
                } => host.ime_set_composition(&text, &underlines, replacement_range, selection_range),
                ImeCall::CommitText {
                    text,
                    replacement_range,
                    relative_cursor_position,
                } => host.ime_commit_text(&text, replacement_range, relative_cursor_position),
                ImeCall::FinishComposingText { keep_selection } => {
                    host.ime_finish_composing_text(keep_selection);
                }
                ImeCall::CancelComposition => host.ime_cancel_composition(),
            }
        }
    }

    fn run_ime(&self, op: impl FnOnce(&mut ImeBridge) -> ImeCalls) {
        let calls = {
            let mut ime = lock(&self.ime);
            op(&mut *ime)
        };
        if calls.is_empty() {
            return;
        }
        if let Some(host) = self.live_host_or_log("ime") {
            self.forward_ime(&host, calls);
        }
    }

    /// Marked text changed.
    pub fn ime_update(&self, update: CompositionUpdate) {
        self.run_ime(|ime| ime.update(update));
    }

    /// Start a fresh composition, cancelling any in progress.
    pub fn ime_begin(&self, update: CompositionUpdate) {
        self.run_ime(|ime| ime.begin(update));
    }

    pub fn ime_commit(&self, text: &str, replacement_range: Utf16Range, relative_cursor_position: i32) {
        self.run_ime(|ime| ime.commit(text, replacement_range, relative_cursor_position));
    }

    pub fn ime_cancel(&self) {
        self.run_ime(ImeBridge::cancel);
    }

    pub fn ime_finish(&self, keep_selection: bool) {
        self.run_ime(|ime| ime.finish_composing(keep_selection));
    }

    #[must_use]
    pub fn ime_phase(&self) -> CompositionPhase {
        lock(&self.ime).phase()
    }

    /// Where the host should place the IME candidate window.
    #[must_use]
    pub fn ime_candidate_anchor(&self) -> Point {
        lock(&self.ime).candidate_anchor()
    }

    pub fn set_ime_follow_mouse(&self, follow: bool) {
        lock(&self.ime).set_follow_mouse(follow);
    }

    // ── host → engine: view and frames ──────────────────────────────────

    /// Host resize. The engine is told only when something changed.
    pub fn resize(&self, geometry: ViewGeometry) {
        let before = self.frames.view();
        if !self.frames.resize(geometry) {
            return;
        }
        let Some(host) = self.live_host_or_log("resize") else {
            return;
        };
        if before.pixel_density != geometry.pixel_density {
            host.notify_screen_info_changed();
        }
        host.was_resized();
    }

    /// Pump one frame when the host drives the frame clock. Returns `true`
    /// if the engine was asked to paint.
    pub fn request_frame(&self) -> bool {
        if !self.config.external_begin_frame {
            return false;
        }
        match self.live_host() {
            Some(host) if host.is_windowless() => {
                host.send_external_begin_frame();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn frames(&self) -> &FrameBridge {
        &self.frames
    }

    #[must_use]
    pub fn composite_plan(&self) -> CompositePlan {
        self.frames.composite_plan()
    }

    #[must_use]
    pub fn frame_reader(&self) -> FrameReader {
        self.frames.reader()
    }

    #[must_use]
    pub fn cursor(&self) -> HostCursor {
        self.cursor.get()
    }

    /// Whether the engine reports keyboard focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.focused.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn selection_text(&self) -> String {
        lock(&self.selection).clone()
    }

    // ── edit commands ───────────────────────────────────────────────────

    /// Apply an edit command to the focused frame. A no-op (debug logged)
    /// when there is no valid browser or no focused frame.
    pub fn execute(&self, command: EditCommand) -> bool {
        let Some(host) = self.live_host() else {
            debug!(target: "osr::session", session = %self.id, ?command, "edit command ignored: no valid browser");
            return false;
        };
        let Some(frame) = host.focused_frame() else {
            debug!(target: "osr::session", session = %self.id, ?command, "edit command ignored: no focused frame");
            return false;
        };
        debug!(target: "osr::session", session = %self.id, ?command, "edit command");
        frame.execute(command);
        true
    }

    /// The host-drawn context menu waiting to be shown.
    #[must_use]
    pub fn pending_context_menu(&self) -> Option<ContextMenu> {
        lock(&self.context_menu).clone()
    }

    pub fn dismiss_context_menu(&self) {
        lock(&self.context_menu).take();
    }

    /// The host's menu reported a selection. Runs the command and closes
    /// the menu; returns `false` if no open menu offers `command_id`.
    pub fn select_context_menu_item(&self, command_id: i32) -> bool {
        let command = {
            let mut pending = lock(&self.context_menu);
            let Some(command) = pending
                .as_ref()
                .and_then(|menu| menu.find(command_id))
                .and_then(|item| item.edit_command())
            else {
                debug!(target: "osr::session", session = %self.id, command_id, "menu selection ignored");
                return false;
            };
            pending.take();
            command
        };
        self.execute(command);
        true
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    /// Ask the engine to close the browser. Completion arrives through
    /// `on_before_close`.
    pub fn request_close(&self, force: bool) -> bool {
        match self.state() {
            SessionState::Closing | SessionState::Closed => return false,
            SessionState::Creating | SessionState::Open => self.set_state(SessionState::Closing),
        }
        info!(target: "osr::session", session = %self.id, force, "close requested");
        if let Some(host) = self.live_host() {
            host.close_browser(force);
        }
        true
    }

    // ── record / replay ─────────────────────────────────────────────────

    /// Apply one recorded host input.
    pub fn apply(&self, input: &HostInput) {
        match input {
            HostInput::Key(event) => {
                self.handle_key(event);
            }
            HostInput::Mouse(event) => self.handle_mouse(event),
            HostInput::Composition(update) => self.ime_update(update.clone()),
            HostInput::Commit(text) => self.ime_commit(text, Utf16Range::INVALID, 0),
            HostInput::CancelComposition => self.ime_cancel(),
            HostInput::Focus(focused) => self.handle_focus(*focused),
            HostInput::Resize(geometry) => self.resize(*geometry),
        }
    }

    /// Apply a recorded trace in order.
    pub fn replay<'a>(&self, inputs: impl IntoIterator<Item = &'a HostInput>) -> usize {
        let mut count = 0;
        for input in inputs {
            self.apply(input);
            count += 1;
        }
        debug!(target: "osr::session", session = %self.id, count, "replayed input");
        count
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("focused", &self.has_focus())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

// ── engine → host ───────────────────────────────────────────────────────

impl PaintSink for Session {
    fn view_rect(&self) -> Rect {
        self.frames.view_rect()
    }

    fn screen_info(&self) -> ScreenInfo {
        self.frames.screen_info()
    }

    fn on_paint(
        &self,
        element: PaintElement,
        dirty_rects: &[Rect],
        buffer: &[u8],
        width: u32,
        height: u32,
    ) {
        if let Err(err) = self
            .frames
            .on_paint(element, dirty_rects, buffer, width, height)
        {
            warn!(target: "osr::frame", session = %self.id, ?element, %err, "paint dropped");
        }
    }

    fn on_accelerated_paint(
        &self,
        element: PaintElement,
        dirty_rects: &[Rect],
        handle: SharedSurfaceHandle,
        width: u32,
        height: u32,
    ) {
        self.frames
            .on_accelerated_paint(element, dirty_rects, handle, width, height);
    }

    fn on_popup_show(&self, visible: bool) {
        self.frames.on_popup_show(visible);
    }

    fn on_popup_size(&self, rect: Rect) {
        self.frames.on_popup_size(rect);
    }

    fn on_text_selection_changed(&self, selected_text: &str, range: Utf16Range) {
        trace!(target: "osr::session", session = %self.id, ?range, "selection changed");
        let mut selection = lock(&self.selection);
        selection.clear();
        selection.push_str(selected_text);
    }

    fn on_composition_range_changed(&self, range: Utf16Range, character_bounds: &[Rect]) {
        lock(&self.ime).on_composition_range_changed(range, character_bounds);
    }

    fn on_cursor_change(&self, cursor: CursorType) -> bool {
        self.cursor.set(cursor.host_cursor());
        true
    }
}

impl InputSink for Session {
    fn on_pre_key_event(&self, event: &EngineKeyEvent) -> PreKeyOutcome {
        if self.config.shortcut_stage != ShortcutStage::PreDispatch {
            return PreKeyOutcome::default();
        }
        match shortcut_command(event, self.config.key_platform) {
            Some(shortcut) => {
                self.execute(shortcut.command);
                PreKeyOutcome {
                    handled: true,
                    is_keyboard_shortcut: shortcut.is_keyboard_shortcut,
                }
            }
            None => PreKeyOutcome::default(),
        }
    }

    fn on_key_event(&self, event: &EngineKeyEvent) -> bool {
        if self.config.shortcut_stage == ShortcutStage::PostDispatch
            && let Some(shortcut) = shortcut_command(event, self.config.key_platform)
        {
            self.execute(shortcut.command);
            return true;
        }
        self.config.swallow_unhandled_keys
    }

    fn on_got_focus(&self) {
        self.focused.store(true, Ordering::Release);
    }

    fn on_take_focus(&self, next: bool) {
        trace!(target: "osr::session", session = %self.id, next, "focus leaving view");
        self.focused.store(false, Ordering::Release);
    }

    fn on_before_context_menu(&self, params: &ContextMenuParams) -> bool {
        let has_selection =
            !params.selection_text.is_empty() || !lock(&self.selection).is_empty();
        let menu = ContextMenu::build(params.position, has_selection);
        debug!(
            target: "osr::session",
            session = %self.id,
            items = menu.items.len(),
            "context menu pending"
        );
        *lock(&self.context_menu) = Some(menu);
        true
    }

    fn on_context_menu_command(&self, command_id: i32) -> bool {
        match EditCommand::from_command_id(command_id) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }
}

impl LifecycleSink for Session {
    fn on_after_created(&self, host: Arc<dyn BrowserHost>) {
        self.host.store(Some(Arc::new(HostRef(Arc::clone(&host)))));
        match self.state() {
            SessionState::Creating => {
                self.set_state(SessionState::Open);
                info!(target: "osr::session", session = %self.id, "browser created");
            }
            SessionState::Closing => {
                info!(target: "osr::session", session = %self.id, "browser created after close request; closing");
                host.close_browser(true);
            }
            state => {
                warn!(target: "osr::session", session = %self.id, ?state, "unexpected browser creation");
            }
        }
    }

    fn do_close(&self) -> bool {
        if self.state() == SessionState::Open {
            self.set_state(SessionState::Closing);
        }
        false
    }

    fn on_before_close(&self) {
        self.host.store(None);
        self.set_state(SessionState::Closed);
        self.focused.store(false, Ordering::Release);
        *lock(&self.ime) = ImeBridge::new();
        lock(&self.context_menu).take();
        info!(target: "osr::session", session = %self.id, "browser closed");
    }
}
