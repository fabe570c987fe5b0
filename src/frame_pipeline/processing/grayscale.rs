use crate::frame_pipeline::common::error::ProcessingResult;
use crate::frame_pipeline::frame::{Frame, PixelFormat};
use crate::frame_pipeline::processing::FrameProcessor;
use crate::frame_pipeline::processing::processor::{output_frame, require_format};

const STAGE_NAME: &str = "grayscale";

/// Integer BT.601 luma. Weights sum to 256 so white stays 255.
#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

/// Reduces RGB and YUV frames to a single intensity channel.
///
/// RGB uses BT.601 luma, YUV keeps its Y sample, GRAYSCALE is copied through.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayscaleProcessor;

impl GrayscaleProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl FrameProcessor for GrayscaleProcessor {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    fn process(&self, frame: &Frame) -> ProcessingResult<Frame> {
        require_format(
            STAGE_NAME,
            frame,
            &[PixelFormat::Rgb, PixelFormat::Yuv, PixelFormat::Grayscale],
        )?;

        let data: Vec<u8> = match frame.format() {
            PixelFormat::Rgb => frame
                .data()
                .chunks_exact(3)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
            PixelFormat::Yuv => frame.data().chunks_exact(3).map(|px| px[0]).collect(),
            PixelFormat::Grayscale => frame.data().to_vec(),
        };

        output_frame(STAGE_NAME, frame, PixelFormat::Grayscale, data)
    }
}
