use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, ensure};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::{debug, info, instrument, trace, warn};

use crate::frame_pipeline::config::InterpreterConfig;
use crate::frame_pipeline::dispatch::{
    Diagnostic, DiagnosticDispatcher, DiagnosticObserver, ObserverId, ResultDispatcher,
    ResultObserver,
};
use crate::frame_pipeline::facade::frame_core::{FrameCore, FrameOutcome, report_diagnostic};
use crate::frame_pipeline::frame::Frame;
use crate::frame_pipeline::interpretation::{GestureClassifier, GestureInterpreter};
use crate::frame_pipeline::processing::{
    CannyEdgeProcessor, ColorThresholdProcessor, FrameProcessor, ProcessingPipeline,
};

/// Coordinates processing, interpretation and result delivery.
///
/// A dedicated worker thread owns the per-frame work, so [`submit_frame`](Self::submit_frame)
/// only enqueues and returns. The queue is bounded; when it is full new frames are dropped
/// and reported rather than blocking the capture source. Frames of one facade are
/// processed strictly one at a time, in submission order.
///
/// The facade is `Send + Sync`: capture and UI threads may share it behind an `Arc`.
pub struct InterpreterFacade {
    sender: Option<Sender<Frame>>,
    worker: Option<JoinHandle<()>>,
    core: Arc<FrameCore>,
    results: Arc<ResultDispatcher>,
    diagnostics: Arc<DiagnosticDispatcher>,
    queue_capacity: usize,
}

impl InterpreterFacade {
    /// Default assembly: `[ColorThreshold, CannyEdge]` followed by `classifier`.
    pub fn from_config<C: GestureClassifier + 'static>(
        config: InterpreterConfig,
        classifier: C,
    ) -> Result<Self> {
        config.validate()?;

        let pipeline = ProcessingPipeline::new()
            .with_stage(ColorThresholdProcessor::with_range(
                config.color_threshold,
                config.color_threshold_high,
            )?)
            .with_stage(CannyEdgeProcessor::new(config.canny_low, config.canny_high)?);
        let interpreter = GestureInterpreter::new(classifier, config.min_confidence)?;

        Self::with_parts(pipeline, interpreter, config.queue_capacity)
    }

    pub fn with_parts(
        pipeline: ProcessingPipeline,
        interpreter: GestureInterpreter,
        queue_capacity: usize,
    ) -> Result<Self> {
        ensure!(queue_capacity > 0, "queue capacity must be at least 1");

        let results = Arc::new(ResultDispatcher::new());
        let diagnostics = Arc::new(DiagnosticDispatcher::new());
        info!(
            stages = ?pipeline.stage_names(),
            min_confidence = interpreter.min_confidence(),
            queue_capacity,
            "Starting gesture interpreter"
        );
        let core = Arc::new(FrameCore::new(
            pipeline,
            interpreter,
            results.clone(),
            diagnostics.clone(),
        ));

        let (sender, receiver) = bounded(queue_capacity);
        let worker = spawn_worker(core.clone(), receiver)?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            core,
            results,
            diagnostics,
            queue_capacity,
        })
    }

    /// Hands a frame to the worker. Never blocks and never fails: a full queue drops the
    /// frame and reports [`Diagnostic::FrameDropped`].
    pub fn submit_frame(&self, frame: Frame) {
        let timestamp = frame.timestamp();
        let Some(sender) = &self.sender else {
            return;
        };

        match sender.try_send(frame) {
            Ok(()) => trace!(timestamp_ns = timestamp.as_nanos(), "Frame queued"),
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                let diagnostic = Diagnostic::FrameDropped {
                    timestamp,
                    queue_capacity: self.queue_capacity,
                };
                report_diagnostic(&self.diagnostics, &diagnostic);
            }
        }
    }

    /// Processes `frame` on the calling thread, after any frame the worker is busy with.
    /// Results and diagnostics are published exactly as for submitted frames.
    ///
    /// Safe to call from inside an observer callback.
    pub fn process_now(&self, frame: Frame) -> FrameOutcome {
        self.core.handle(frame)
    }

    /// Appends a stage to the running pipeline. Applies from the next frame on.
    pub fn add_stage<P: FrameProcessor + 'static>(&self, stage: P) {
        self.core.lock_stages().pipeline.add_stage(stage);
    }

    /// Removes the first stage called `name`. Returns `false` if there is none.
    pub fn remove_stage(&self, name: &str) -> bool {
        self.core.lock_stages().pipeline.remove_stage(name).is_some()
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.core
            .lock_stages()
            .pipeline
            .stage_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn add_observer<T: ResultObserver + 'static>(&self, observer: &Arc<T>) -> ObserverId {
        self.results.subscribe(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.results.unsubscribe(id)
    }

    pub fn add_diagnostic_observer<T: DiagnosticObserver + 'static>(
        &self,
        observer: &Arc<T>,
    ) -> ObserverId {
        self.diagnostics.subscribe(observer)
    }

    pub fn remove_diagnostic_observer(&self, id: ObserverId) -> bool {
        self.diagnostics.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.results.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Stops accepting frames, lets the worker finish everything already queued, and
    /// waits for it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    #[instrument(level = "debug", skip(self))]
    fn stop(&mut self) {
        // Closing the channel ends the worker loop once the queue is drained.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Frame worker terminated abnormally");
            }
            debug!("Frame worker stopped");
        }
    }
}

impl Drop for InterpreterFacade {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_worker(core: Arc<FrameCore>, frames: Receiver<Frame>) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("frame-worker".to_string())
        .spawn(move || {
            for frame in frames.iter() {
                core.handle(frame);
            }
        })
        .context("Failed to spawn frame worker thread")
}
