//! Frame processing module
//!
//! Processing stages share a single `process` capability and are chained by
//! [`ProcessingPipeline`] in caller-specified order.

mod processor;
mod pipeline;
mod grayscale;
mod color_threshold;
mod canny_edge;
mod timing;


pub use processor::FrameProcessor;
pub use pipeline::ProcessingPipeline;
pub use grayscale::GrayscaleProcessor;
pub use color_threshold::ColorThresholdProcessor;
pub use canny_edge::CannyEdgeProcessor;
pub use timing::{PipelineTimings, StageTiming};
