//! Frame value types

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::frame_pipeline::common::error::{FrameError, FrameResult};

/// Pixel layout of a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Interleaved 8-bit [R, G, B, R, G, B, ...]
    Rgb,
    /// One 8-bit intensity sample per pixel
    Grayscale,
    /// Packed 4:4:4 [Y, U, V, Y, U, V, ...]
    Yuv,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb | PixelFormat::Yuv => 3,
            PixelFormat::Grayscale => 1,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Rgb => "RGB",
            PixelFormat::Grayscale => "GRAYSCALE",
            PixelFormat::Yuv => "YUV",
        };
        f.write_str(name)
    }
}

/// Monotonic capture time in nanoseconds, relative to a source-chosen origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameTimestamp(pub u64);

impl FrameTimestamp {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Timestamp of `now` measured from a capture session's `origin`.
    pub fn since(origin: Instant, now: Instant) -> Self {
        let elapsed = now.saturating_duration_since(origin);
        Self(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    pub const fn as_duration(self) -> Duration {
        Duration::from_nanos(self.0)
    }
}

impl fmt::Display for FrameTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}ms", self.0 as f64 / 1_000_000.0)
    }
}

/// One camera image.
///
/// The buffer length always equals `width * height * format.bytes_per_pixel()`;
/// construction is the only place that can establish this, so there is no mutable access.
/// Stages derive new frames instead of editing existing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: usize,
    height: usize,
    format: PixelFormat,
    timestamp: FrameTimestamp,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        format: PixelFormat,
        timestamp: FrameTimestamp,
    ) -> FrameResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions(width, height));
        }

        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or(FrameError::InvalidDimensions(width, height))?;

        if data.len() != expected {
            return Err(FrameError::BufferSizeMismatch {
                format,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            format,
            timestamp,
        })
    }

    /// A frame of the given geometry with every byte set to `value`.
    pub fn filled(
        width: usize,
        height: usize,
        format: PixelFormat,
        value: u8,
        timestamp: FrameTimestamp,
    ) -> FrameResult<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or(FrameError::InvalidDimensions(width, height))?;
        Self::new(vec![value; len], width, height, format, timestamp)
    }

    /// Builds a frame with this frame's geometry and timestamp but new pixel data.
    pub fn with_data(&self, format: PixelFormat, data: Vec<u8>) -> FrameResult<Self> {
        Self::new(data, self.width, self.height, format, self.timestamp)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn timestamp(&self) -> FrameTimestamp {
        self.timestamp
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}
