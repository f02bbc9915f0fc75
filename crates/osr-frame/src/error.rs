#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FrameError>;

/// A paint callback that could not be turned into a frame.
///
/// Never propagated past the callback boundary; the session logs it and the
/// frame is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("paint buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("paint of empty frame {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },

    #[error("frame {width}x{height} is too large to address")]
    FrameTooLarge { width: u32, height: u32 },
}
