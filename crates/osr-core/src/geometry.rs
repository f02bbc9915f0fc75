#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All rectangles and points are in view coordinates (device-independent
//! pixels, origin at the top-left of the browser view) unless a function
//! says otherwise. Device pixels are obtained with [`Rect::scale`].

/// A rectangle for view rects, dirty regions, and popup placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Area in pixels. Negative extents count as zero.
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle that is the union of this rectangle and another.
    ///
    /// The result is the smallest rectangle that contains both. Empty
    /// rectangles do not contribute.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect::new(x, y, right - x, bottom - y)
    }

    /// Scale into device pixels, rounding outward so the scaled rectangle
    /// always covers the original.
    #[must_use]
    pub fn scale(&self, factor: f32) -> Rect {
        if factor == 1.0 {
            return *self;
        }
        let x = (self.x as f32 * factor).floor() as i32;
        let y = (self.y as f32 * factor).floor() as i32;
        let right = (self.right() as f32 * factor).ceil() as i32;
        let bottom = (self.bottom() as f32 * factor).ceil() as i32;
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Move this rectangle so it lies inside `bounds` where possible.
    ///
    /// Negative origins snap to the bounds origin; rectangles hanging past
    /// the right or bottom edge are shifted back. A rectangle larger than
    /// `bounds` keeps its size and is pinned to the bounds origin.
    #[must_use]
    pub fn clamp_within(&self, bounds: &Rect) -> Rect {
        let mut r = *self;
        if r.right() > bounds.right() {
            r.x = bounds.right() - r.width;
        }
        if r.bottom() > bounds.bottom() {
            r.y = bounds.bottom() - r.height;
        }
        if r.x < bounds.x {
            r.x = bounds.x;
        }
        if r.y < bounds.y {
            r.y = bounds.y;
        }
        r
    }
}

/// A point in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Current size and density of the off-screen view.
///
/// Width and height are in device-independent pixels; the engine renders
/// `width * pixel_density` by `height * pixel_density` device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    pub width: u32,
    pub height: u32,
    pub pixel_density: f32,
}

impl ViewGeometry {
    /// Smallest density the engine accepts.
    pub const MIN_DENSITY: f32 = 1.0;
    /// Largest density the engine accepts.
    pub const MAX_DENSITY: f32 = 4.0;

    /// Create a geometry, clamping the density into the supported range.
    #[must_use]
    pub fn new(width: u32, height: u32, pixel_density: f32) -> Self {
        let pixel_density = if pixel_density.is_finite() {
            pixel_density.clamp(Self::MIN_DENSITY, Self::MAX_DENSITY)
        } else {
            Self::MIN_DENSITY
        };
        Self {
            width,
            height,
            pixel_density,
        }
    }

    /// The view rectangle reported to the engine (origin is always zero).
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        Rect::from_size(clamp_i32(self.width), clamp_i32(self.height))
    }

    /// Size of the backing texture in device pixels.
    #[must_use]
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_density).round() as u32,
            (self.height as f32 * self.pixel_density).round() as u32,
        )
    }
}

impl Default for ViewGeometry {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

/// Screen description answered to the engine's screen-info query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    pub device_scale_factor: f32,
    /// Full screen in view coordinates.
    pub rect: Rect,
    /// Usable part of the screen. The off-screen view has no task bars, so
    /// this equals `rect`.
    pub available_rect: Rect,
}

impl From<ViewGeometry> for ScreenInfo {
    fn from(geometry: ViewGeometry) -> Self {
        let rect = geometry.view_rect();
        Self {
            device_scale_factor: geometry.pixel_density,
            rect,
            available_rect: rect,
        }
    }
}

#[inline]
fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
