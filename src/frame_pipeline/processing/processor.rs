use std::sync::Arc;

use crate::frame_pipeline::common::error::{ProcessingError, ProcessingResult, StageFailure};
use crate::frame_pipeline::frame::{Frame, PixelFormat};

/// A single frame transform.
///
/// Implementations must not keep mutable state across calls; the same stage may be
/// shared between pipelines and threads.
pub trait FrameProcessor: Send + Sync {
    /// Name reported in errors, spans and timings.
    fn name(&self) -> &str;

    fn process(&self, frame: &Frame) -> ProcessingResult<Frame>;
}

impl<P: FrameProcessor + ?Sized> FrameProcessor for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(&self, frame: &Frame) -> ProcessingResult<Frame> {
        (**self).process(frame)
    }
}

impl<P: FrameProcessor + ?Sized> FrameProcessor for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(&self, frame: &Frame) -> ProcessingResult<Frame> {
        (**self).process(frame)
    }
}

pub(crate) fn require_format(
    stage: &str,
    frame: &Frame,
    expected: &'static [PixelFormat],
) -> ProcessingResult<()> {
    if expected.contains(&frame.format()) {
        return Ok(());
    }
    Err(ProcessingError::new(
        stage,
        StageFailure::UnsupportedFormat {
            expected,
            actual: frame.format(),
        },
    ))
}

/// Wraps a derived-frame construction error with the stage that produced it.
pub(crate) fn output_frame(
    stage: &str,
    source: &Frame,
    format: PixelFormat,
    data: Vec<u8>,
) -> ProcessingResult<Frame> {
    source
        .with_data(format, data)
        .map_err(|e| ProcessingError::new(stage, StageFailure::InvalidFrame(e)))
}
