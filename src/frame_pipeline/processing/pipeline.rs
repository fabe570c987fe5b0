use std::time::Instant;

use tracing::field::Empty;
use tracing::{debug, instrument};

use crate::frame_pipeline::common::error::ProcessingResult;
use crate::frame_pipeline::frame::Frame;
use crate::frame_pipeline::processing::{FrameProcessor, PipelineTimings};

const STAGE_NAME: &str = "pipeline";

/// Ordered chain of processing stages.
///
/// Each stage receives the previous stage's output. The first failing stage aborts the
/// traversal and its error is returned; no partially processed frame escapes.
///
/// A pipeline is itself a [`FrameProcessor`], so a sub-pipeline can be added as a single
/// stage of another one. Errors from nested stages keep the inner stage's name.
#[derive(Default)]
pub struct ProcessingPipeline {
    stages: Vec<Box<dyn FrameProcessor>>,
}

impl ProcessingPipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage. Order is preserved and the same kind of stage may appear more than once.
    pub fn add_stage<P: FrameProcessor + 'static>(&mut self, stage: P) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn with_stage<P: FrameProcessor + 'static>(mut self, stage: P) -> Self {
        self.add_stage(stage);
        self
    }

    /// Removes the first stage called `name` and returns it; the rest keep their order.
    pub fn remove_stage(&mut self, name: &str) -> Option<Box<dyn FrameProcessor>> {
        let index = self.stages.iter().position(|s| s.name() == name)?;
        Some(self.stages.remove(index))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in insertion order. An empty pipeline returns `frame` untouched.
    pub fn run(&self, frame: Frame) -> ProcessingResult<Frame> {
        self.run_with_timings(frame).map(|(frame, _)| frame)
    }

    #[instrument(level = "debug", skip_all, fields(
        stages = self.stages.len(),
        width = frame.width(),
        height = frame.height(),
        format = %frame.format(),
    ))]
    pub fn run_with_timings(&self, frame: Frame) -> ProcessingResult<(Frame, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let mut current = frame;

        for stage in &self.stages {
            let span = tracing::debug_span!("stage", name = stage.name(), elapsed_us = Empty);
            let _entered = span.enter();
            let started = Instant::now();
            current = stage.process(&current).inspect_err(|e| {
                debug!(error = %e, "Stage rejected frame, aborting traversal");
            })?;
            let elapsed = started.elapsed();
            span.record("elapsed_us", elapsed.as_micros() as u64);
            timings.record(stage.name(), elapsed);
        }

        Ok((current, timings))
    }
}

impl FrameProcessor for ProcessingPipeline {
    fn name(&self) -> &str {
        STAGE_NAME
    }

    fn process(&self, frame: &Frame) -> ProcessingResult<Frame> {
        self.run(frame.clone())
    }
}
