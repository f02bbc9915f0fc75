#![forbid(unsafe_code)]

//! Bridge configuration.
//!
//! # Defaults
//!
//! | Setting | Default | Range | Description |
//! |---------|---------|-------|-------------|
//! | `key_platform` | host OS | macos/windows/linux | Native key code convention |
//! | `accelerated_paint` | false | - | Use shared GPU surfaces instead of pixel buffers |
//! | `windowless_frame_rate` | 60 | 1-240 | Engine frame rate when it drives its own timer |
//! | `external_begin_frame` | true | - | Host pumps frames explicitly |
//! | `shortcut_stage` | pre | pre/post | Where edit shortcuts are intercepted |
//! | `swallow_unhandled_keys` | true on macOS | - | Report post-dispatch keys as handled |
//! | `wheel_scale` | 1.0 | 0.1-10.0 | Multiplier for host wheel deltas |
//! | `pixel_density` | 1.0 | 1.0-4.0 | Initial device scale factor |
//!
//! # Environment Variables
//!
//! | Variable | Type | Description |
//! |----------|------|-------------|
//! | `OSR_KEY_PLATFORM` | string | `macos`, `windows` or `linux` |
//! | `OSR_ACCELERATED_PAINT` | bool | Shared-surface paint path |
//! | `OSR_WINDOWLESS_FRAME_RATE` | u32 | Engine frame rate |
//! | `OSR_EXTERNAL_BEGIN_FRAME` | bool | Host-driven frame pump |
//! | `OSR_SHORTCUT_STAGE` | string | `pre` or `post` |
//! | `OSR_SWALLOW_UNHANDLED_KEYS` | bool | Post-dispatch keys reported handled |
//! | `OSR_WHEEL_SCALE` | f32 | Wheel delta multiplier |
//! | `OSR_PIXEL_DENSITY` | f32 | Initial device scale factor |
//!
//! Boolean variables accept `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`.
//! Unparseable values are ignored and the default is kept.
//!
//! ```bash
//! export OSR_KEY_PLATFORM=windows
//! export OSR_SHORTCUT_STAGE=post
//! ```

use crate::geometry::ViewGeometry;

const ENV_KEY_PLATFORM: &str = "OSR_KEY_PLATFORM";
const ENV_ACCELERATED_PAINT: &str = "OSR_ACCELERATED_PAINT";
const ENV_WINDOWLESS_FRAME_RATE: &str = "OSR_WINDOWLESS_FRAME_RATE";
const ENV_EXTERNAL_BEGIN_FRAME: &str = "OSR_EXTERNAL_BEGIN_FRAME";
const ENV_SHORTCUT_STAGE: &str = "OSR_SHORTCUT_STAGE";
const ENV_SWALLOW_UNHANDLED_KEYS: &str = "OSR_SWALLOW_UNHANDLED_KEYS";
const ENV_WHEEL_SCALE: &str = "OSR_WHEEL_SCALE";
const ENV_PIXEL_DENSITY: &str = "OSR_PIXEL_DENSITY";

/// Default engine frame rate.
pub const DEFAULT_FRAME_RATE: u32 = 60;
/// Minimum engine frame rate.
pub const MIN_FRAME_RATE: u32 = 1;
/// Maximum engine frame rate.
pub const MAX_FRAME_RATE: u32 = 240;
/// Minimum wheel multiplier.
pub const MIN_WHEEL_SCALE: f32 = 0.1;
/// Maximum wheel multiplier.
pub const MAX_WHEEL_SCALE: f32 = 10.0;

/// Native key code convention of the engine build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPlatform {
    /// `native_key_code` is a macOS virtual key (kVK) code.
    MacOs,
    /// `windows_key_code` is authoritative; native code carries the scancode.
    Windows,
    /// Same convention as Windows.
    Linux,
}

impl KeyPlatform {
    /// Convention of the platform this crate was compiled for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "macos" | "mac" | "darwin" => Some(Self::MacOs),
            "windows" | "win" => Some(Self::Windows),
            "linux" | "x11" => Some(Self::Linux),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }
}

/// Where edit shortcuts (undo, copy, ...) are intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShortcutStage {
    /// Before the engine's default key handling; the engine never sees the
    /// shortcut.
    #[default]
    PreDispatch,
    /// After the engine had its chance and left the key unhandled.
    PostDispatch,
}

impl ShortcutStage {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pre" | "pre-dispatch" | "pre_dispatch" => Some(Self::PreDispatch),
            "post" | "post-dispatch" | "post_dispatch" => Some(Self::PostDispatch),
            _ => None,
        }
    }
}

/// Configuration for one browser session.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub key_platform: KeyPlatform,
    pub accelerated_paint: bool,
    pub windowless_frame_rate: u32,
    pub external_begin_frame: bool,
    pub shortcut_stage: ShortcutStage,
    /// Report every post-dispatch key event as handled. On macOS an
    /// unhandled event is re-sent to the application and triggers native
    /// menu shortcuts.
    pub swallow_unhandled_keys: bool,
    pub wheel_scale: f32,
    /// Initial view size and density.
    pub initial_view: ViewGeometry,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::for_platform(KeyPlatform::host())
    }
}

/// Settings handed to the engine when the browser is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserSettings {
    pub windowless_frame_rate: u32,
    pub shared_texture_enabled: bool,
    pub external_begin_frame_enabled: bool,
}

impl BridgeConfig {
    /// Defaults for a given key platform.
    #[must_use]
    pub fn for_platform(key_platform: KeyPlatform) -> Self {
        Self {
            key_platform,
            accelerated_paint: false,
            windowless_frame_rate: DEFAULT_FRAME_RATE,
            external_begin_frame: true,
            shortcut_stage: ShortcutStage::PreDispatch,
            swallow_unhandled_keys: key_platform == KeyPlatform::MacOs,
            wheel_scale: 1.0,
            initial_view: ViewGeometry::default(),
        }
    }

    #[must_use]
    pub fn with_accelerated_paint(mut self, enabled: bool) -> Self {
        self.accelerated_paint = enabled;
        self
    }

    #[must_use]
    pub fn with_shortcut_stage(mut self, stage: ShortcutStage) -> Self {
        self.shortcut_stage = stage;
        self
    }

    #[must_use]
    pub fn with_swallow_unhandled_keys(mut self, swallow: bool) -> Self {
        self.swallow_unhandled_keys = swallow;
        self
    }

    #[must_use]
    pub fn with_external_begin_frame(mut self, enabled: bool) -> Self {
        self.external_begin_frame = enabled;
        self
    }

    #[must_use]
    pub fn with_wheel_scale(mut self, scale: f32) -> Self {
        self.wheel_scale = scale;
        self
    }

    #[must_use]
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.windowless_frame_rate = fps;
        self
    }

    #[must_use]
    pub fn with_initial_view(mut self, view: ViewGeometry) -> Self {
        self.initial_view = view;
        self
    }

    /// Load config from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load config using a custom environment lookup (for tests).
    ///
    /// The key platform is read first so that platform-dependent defaults
    /// (`swallow_unhandled_keys`) follow it unless overridden.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let platform = get_env(ENV_KEY_PLATFORM)
            .and_then(|v| KeyPlatform::parse(&v))
            .unwrap_or_else(KeyPlatform::host);
        let mut config = Self::for_platform(platform);

        if let Some(v) = get_env(ENV_ACCELERATED_PAINT).and_then(|v| parse_bool(&v)) {
            config.accelerated_paint = v;
        }
        if let Some(v) = get_env(ENV_WINDOWLESS_FRAME_RATE)
            && let Ok(fps) = v.trim().parse::<u32>()
        {
            config.windowless_frame_rate = fps;
        }
        if let Some(v) = get_env(ENV_EXTERNAL_BEGIN_FRAME).and_then(|v| parse_bool(&v)) {
            config.external_begin_frame = v;
        }
        if let Some(stage) = get_env(ENV_SHORTCUT_STAGE).and_then(|v| ShortcutStage::parse(&v)) {
            config.shortcut_stage = stage;
        }
        if let Some(v) = get_env(ENV_SWALLOW_UNHANDLED_KEYS).and_then(|v| parse_bool(&v)) {
            config.swallow_unhandled_keys = v;
        }
        if let Some(v) = get_env(ENV_WHEEL_SCALE)
            && let Ok(scale) = v.trim().parse::<f32>()
        {
            config.wheel_scale = scale;
        }
        if let Some(v) = get_env(ENV_PIXEL_DENSITY)
            && let Ok(density) = v.trim().parse::<f32>()
        {
            let view = config.initial_view;
            config.initial_view = ViewGeometry::new(view.width, view.height, density);
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.windowless_frame_rate = self
            .windowless_frame_rate
            .clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
        self.wheel_scale = if self.wheel_scale.is_finite() {
            self.wheel_scale.clamp(MIN_WHEEL_SCALE, MAX_WHEEL_SCALE)
        } else {
            1.0
        };
        let view = self.initial_view;
        self.initial_view = ViewGeometry::new(view.width, view.height, view.pixel_density);
        self
    }

    /// Settings to pass to the engine at browser creation.
    #[must_use]
    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            windowless_frame_rate: self.windowless_frame_rate,
            shared_texture_enabled: self.accelerated_paint,
            external_begin_frame_enabled: self.external_begin_frame,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
