use std::ops::RangeInclusive;

use crate::frame_pipeline::common::error::{ProcessingError, ProcessingResult, StageFailure};
use crate::frame_pipeline::frame::{Frame, PixelFormat};
use crate::frame_pipeline::processing::FrameProcessor;
use crate::frame_pipeline::processing::grayscale::luma;
use crate::frame_pipeline::processing::processor::{output_frame, require_format};

const STAGE_NAME: &str = "color_threshold";

/// Value written for pixels inside the threshold range.
pub const MASK_ON: u8 = u8::MAX;
/// Value written for pixels outside the threshold range.
pub const MASK_OFF: u8 = 0;

/// Binary mask from per-pixel intensity.
///
/// GRAYSCALE pixels are compared directly, RGB pixels by their luma. Pixels whose
/// intensity lies in the inclusive range become [`MASK_ON`], all others [`MASK_OFF`].
/// Output is always GRAYSCALE.
#[derive(Debug, Clone)]
pub struct ColorThresholdProcessor {
    range: RangeInclusive<u8>,
}

impl ColorThresholdProcessor {
    /// Keeps everything at or above `threshold`.
    pub fn new(threshold: u8) -> Self {
        Self {
            range: threshold..=u8::MAX,
        }
    }

    pub fn with_range(low: u8, high: u8) -> ProcessingResult<Self> {
        if low > high {
            return Err(ProcessingError::new(
                STAGE_NAME,
                StageFailure::InvalidParameters(format!(
                    "threshold low {low} exceeds high {high}"
                )),
            ));
        }
        Ok(Self { range: low..=high })
    }

    pub fn range(&self) -> &RangeInclusive<u8> {
        &self.range
    }

    #[inline]
    fn classify(&self, intensity: u8) -> u8 {
        if self.range.contains(&intensity) {
            MASK_ON
        } else {
            MASK_OFF
        }
    }
}

impl FrameProcessor for ColorThresholdProcessor {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    fn process(&self, frame: &Frame) -> ProcessingResult<Frame> {
        require_format(STAGE_NAME, frame, &[PixelFormat::Rgb, PixelFormat::Grayscale])?;

        let data: Vec<u8> = match frame.format() {
            PixelFormat::Rgb => frame
                .data()
                .chunks_exact(3)
                .map(|px| self.classify(luma(px[0], px[1], px[2])))
                .collect(),
            _ => frame.data().iter().map(|&v| self.classify(v)).collect(),
        };

        output_frame(STAGE_NAME, frame, PixelFormat::Grayscale, data)
    }
}
