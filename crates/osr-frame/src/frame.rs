#![forbid(unsafe_code)]

//! Frame buffers handed from the engine to the renderer.
//!
//! A software paint only borrows the engine's pixels for the duration of
//! the callback, so [`SoftwareFrame::copy_from`] copies before returning.
//! An accelerated paint hands over a [`SharedSurfaceHandle`], a plain value
//! naming a GPU surface the engine keeps alive until its next paint.

use osr_core::geometry::Rect;

use crate::error::{FrameError, Result};

/// Bytes per BGRA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Which layer a paint targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintElement {
    View,
    Popup,
}

/// A CPU-side BGRA frame owned by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareFrame {
    width: u32,
    height: u32,
    pixel_density: f32,
    pixels: Vec<u8>,
    dirty_rects: Vec<Rect>,
}

fn expected_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(FrameError::EmptyFrame { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
        .ok_or(FrameError::FrameTooLarge { width, height })
}

impl SoftwareFrame {
    /// Copy an engine paint buffer.
    ///
    /// The engine always hands over the full view, so the whole buffer is
    /// copied; `dirty_rects` is kept, clipped to the frame, for renderers
    /// that upload partially. Returns the frame and the number of bytes
    /// read from `buffer`.
    pub fn copy_from(
        buffer: &[u8],
        width: u32,
        height: u32,
        pixel_density: f32,
        dirty_rects: &[Rect],
    ) -> Result<(Self, usize)> {
        let expected = expected_len(width, height)?;
        if buffer.len() != expected {
            return Err(FrameError::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }

        let bounds = Rect::from_size(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        let mut clipped: Vec<Rect> = dirty_rects
            .iter()
            .filter_map(|r| r.intersection_opt(&bounds))
            .collect();
        if clipped.is_empty() {
            clipped.push(bounds);
        }

        let pixels = buffer.to_vec();
        let copied = pixels.len();
        Ok((
            Self {
                width,
                height,
                pixel_density,
                pixels,
                dirty_rects: clipped,
            },
            copied,
        ))
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn dirty_rects(&self) -> &[Rect] {
        &self.dirty_rects
    }

    /// BGRA value at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.pixels.get(off..off + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Opaque name of an engine-owned GPU surface (IOSurface, DXGI handle, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SharedSurfaceHandle(pub u64);

/// A GPU-resident frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceFrame {
    pub handle: SharedSurfaceHandle,
    pub width: u32,
    pub height: u32,
    pub dirty_rects: Vec<Rect>,
}

/// Either kind of frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBuffer {
    Software(SoftwareFrame),
    Accelerated(SurfaceFrame),
}

impl FrameBuffer {
    #[must_use]
    pub fn dirty_rects(&self) -> &[Rect] {
        match self {
            Self::Software(frame) => frame.dirty_rects(),
            Self::Accelerated(frame) => &frame.dirty_rects,
        }
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Software(frame) => (frame.width, frame.height),
            Self::Accelerated(frame) => (frame.width, frame.height),
        }
    }

    #[must_use]
    pub fn as_software(&self) -> Option<&SoftwareFrame> {
        match self {
            Self::Software(frame) => Some(frame),
            Self::Accelerated(_) => None,
        }
    }

    #[must_use]
    pub fn surface_handle(&self) -> Option<SharedSurfaceHandle> {
        match self {
            Self::Software(_) => None,
            Self::Accelerated(frame) => Some(frame.handle),
        }
    }
}
