use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::frame_pipeline::common::panic::panic_message;
use crate::frame_pipeline::dispatch::{Diagnostic, DiagnosticDispatcher, PublishReport, ResultDispatcher};
use crate::frame_pipeline::frame::Frame;
use crate::frame_pipeline::interpretation::{GestureInterpreter, InterpretationResult};
use crate::frame_pipeline::processing::ProcessingPipeline;

/// What happened to one submitted frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame was interpreted and the result published
    Published {
        result: InterpretationResult,
        report: PublishReport,
    },
    /// The frame was rejected; the diagnostic has been reported
    Failed(Diagnostic),
}

/// The part of a cycle that must not run for two frames at once.
pub(crate) struct Stages {
    pub(crate) pipeline: ProcessingPipeline,
    interpreter: GestureInterpreter,
}

impl Stages {
    fn interpret(&self, frame: Frame) -> Result<InterpretationResult, Diagnostic> {
        let timestamp = frame.timestamp();

        let (processed, timings) = self
            .pipeline
            .run_with_timings(frame)
            .map_err(|error| Diagnostic::Processing { timestamp, error })?;
        timings.log_summary();

        self.interpreter
            .interpret(&processed)
            .map_err(|error| Diagnostic::Interpretation { timestamp, error })
    }
}

/// Pipeline and interpreter for one facade, plus the hubs results are published to.
///
/// Only processing and interpretation hold the stage lock. Publishing happens after it is
/// released, so an observer may call back into the facade.
pub(crate) struct FrameCore {
    stages: Mutex<Stages>,
    results: Arc<ResultDispatcher>,
    diagnostics: Arc<DiagnosticDispatcher>,
}

impl FrameCore {
    pub(crate) fn new(
        pipeline: ProcessingPipeline,
        interpreter: GestureInterpreter,
        results: Arc<ResultDispatcher>,
        diagnostics: Arc<DiagnosticDispatcher>,
    ) -> Self {
        Self {
            stages: Mutex::new(Stages { pipeline, interpreter }),
            results,
            diagnostics,
        }
    }

    pub(crate) fn lock_stages(&self) -> MutexGuard<'_, Stages> {
        self.stages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one interpretation cycle. Never panics and never returns an error: every
    /// failure ends up as a reported [`Diagnostic`].
    pub(crate) fn handle(&self, frame: Frame) -> FrameOutcome {
        let timestamp = frame.timestamp();
        let _span = tracing::debug_span!("frame", timestamp_ns = timestamp.as_nanos()).entered();

        let interpreted = {
            let stages = self.lock_stages();
            panic::catch_unwind(AssertUnwindSafe(|| stages.interpret(frame))).unwrap_or_else(
                |payload| {
                    Err(Diagnostic::WorkerPanic {
                        timestamp,
                        message: panic_message(payload.as_ref()),
                    })
                },
            )
        };

        match interpreted {
            Ok(result) => {
                let report = self.results.publish(&result);
                if !report.is_clean() {
                    self.report(&Diagnostic::ObserverFailures {
                        timestamp,
                        failures: report.failures.clone(),
                    });
                }
                FrameOutcome::Published { result, report }
            }
            Err(diagnostic) => {
                self.report(&diagnostic);
                FrameOutcome::Failed(diagnostic)
            }
        }
    }

    fn report(&self, diagnostic: &Diagnostic) {
        report_diagnostic(&self.diagnostics, diagnostic);
    }
}

/// Publishes to the diagnostic channel, or logs when nobody listens.
pub(crate) fn report_diagnostic(diagnostics: &DiagnosticDispatcher, diagnostic: &Diagnostic) {
    if diagnostics.is_empty() {
        warn!("{diagnostic}");
        return;
    }
    let report = diagnostics.publish(diagnostic);
    debug!(delivered = report.delivered, "Reported diagnostic");
}
