use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::frame_pipeline::common::error::{InterpretationFailure, ObserverError, ObserverResult, StageFailure};
use crate::frame_pipeline::config::InterpreterConfig;
use crate::frame_pipeline::dispatch::{Diagnostic, DiagnosticObserver, ResultObserver};
use crate::frame_pipeline::facade::{FrameOutcome, InterpreterFacade};
use crate::frame_pipeline::frame::{Frame, FrameTimestamp, PixelFormat};
use crate::frame_pipeline::interpretation::{
    Candidate, GestureClassifier, GestureInterpreter, InterpretationResult,
};
use crate::frame_pipeline::processing::{ColorThresholdProcessor, ProcessingPipeline};

struct FixedClassifier {
    label: &'static str,
    confidence: f32,
}

impl GestureClassifier for FixedClassifier {
    fn classify(&self, _frame: &Frame) -> anyhow::Result<Vec<Candidate>> {
        Ok(vec![Candidate::new(self.label, self.confidence)])
    }
}

/// Panics on frames whose first pixel is zero.
struct PanickyClassifier;

impl GestureClassifier for PanickyClassifier {
    fn classify(&self, frame: &Frame) -> anyhow::Result<Vec<Candidate>> {
        if frame.data()[0] == 0 {
            panic!("Mock classifier panic");
        }
        Ok(vec![Candidate::new("ok", 1.0)])
    }
}

/// Blocks inside `classify` until released, announcing each entry.
struct GateClassifier {
    entered: Sender<()>,
    release: Receiver<()>,
}

impl GestureClassifier for GateClassifier {
    fn classify(&self, _frame: &Frame) -> anyhow::Result<Vec<Candidate>> {
        let _ = self.entered.send(());
        let _ = self.release.recv_timeout(Duration::from_secs(10));
        Ok(vec![Candidate::new("X", 0.9)])
    }
}

#[derive(Default)]
struct CollectingObserver {
    should_fail: bool,
    results: Mutex<Vec<InterpretationResult>>,
}

impl ResultObserver for CollectingObserver {
    fn name(&self) -> &str {
        "collector"
    }

    fn on_result(&self, result: &InterpretationResult) -> ObserverResult {
        self.results.lock().unwrap().push(result.clone());
        if self.should_fail {
            return Err(ObserverError::new("Mock observer error"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct CollectingDiagnostics {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticObserver for CollectingDiagnostics {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) -> ObserverResult {
        self.diagnostics.lock().unwrap().push(diagnostic.clone());
        Ok(())
    }
}

/// Calls back into the facade once from inside its own result callback.
struct ReentrantObserver {
    facade: Mutex<Option<Arc<InterpreterFacade>>>,
    seen: Sender<FrameTimestamp>,
}

impl ResultObserver for ReentrantObserver {
    fn on_result(&self, result: &InterpretationResult) -> ObserverResult {
        let _ = self.seen.send(result.source_frame_timestamp);
        let facade = self.facade.lock().unwrap().take();
        if let Some(facade) = facade {
            facade.process_now(rgb(255, 99));
        }
        Ok(())
    }
}

fn threshold_facade<C: GestureClassifier + 'static>(classifier: C, capacity: usize) -> InterpreterFacade {
    let pipeline = ProcessingPipeline::new().with_stage(ColorThresholdProcessor::new(128));
    let interpreter = GestureInterpreter::new(classifier, 0.5).unwrap();
    InterpreterFacade::with_parts(pipeline, interpreter, capacity).unwrap()
}

fn rgb(value: u8, ts: u64) -> Frame {
    Frame::filled(4, 4, PixelFormat::Rgb, value, FrameTimestamp(ts)).unwrap()
}

fn yuv(ts: u64) -> Frame {
    Frame::filled(4, 4, PixelFormat::Yuv, 200, FrameTimestamp(ts)).unwrap()
}

#[test]
fn test_process_now_publishes_result() {
    let facade = threshold_facade(FixedClassifier { label: "X", confidence: 0.9 }, 2);
    let observer = Arc::new(CollectingObserver::default());
    facade.add_observer(&observer);

    let outcome = facade.process_now(rgb(255, 1));

    let expected = InterpretationResult::recognized("X", 0.9, FrameTimestamp(1));
    match outcome {
        FrameOutcome::Published { result, report } => {
            assert_eq!(result, expected);
            assert_eq!(report.delivered, 1);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(*observer.results.lock().unwrap(), vec![expected]);
}

#[test]
fn test_rejected_frame_becomes_diagnostic() {
    let facade = threshold_facade(FixedClassifier { label: "X", confidence: 0.9 }, 2);
    let observer = Arc::new(CollectingObserver::default());
    let diagnostics = Arc::new(CollectingDiagnostics::default());
    facade.add_observer(&observer);
    facade.add_diagnostic_observer(&diagnostics);

    let outcome = facade.process_now(yuv(5));

    let FrameOutcome::Failed(Diagnostic::Processing { timestamp, error }) = outcome else {
        panic!("expected a processing diagnostic");
    };
    assert_eq!(timestamp, FrameTimestamp(5));
    assert_eq!(error.stage, "color_threshold");
    assert!(matches!(error.reason, StageFailure::UnsupportedFormat { .. }));
    assert!(observer.results.lock().unwrap().is_empty());
    assert_eq!(diagnostics.diagnostics.lock().unwrap().len(), 1);
}

#[test]
fn test_interpreter_rejection_becomes_diagnostic() {
    // No stages, so an RGB frame reaches the interpreter unconverted.
    let interpreter = GestureInterpreter::new(FixedClassifier { label: "X", confidence: 0.9 }, 0.5).unwrap();
    let facade = InterpreterFacade::with_parts(ProcessingPipeline::new(), interpreter, 1).unwrap();

    let outcome = facade.process_now(rgb(1, 2));

    let FrameOutcome::Failed(Diagnostic::Interpretation { error, .. }) = outcome else {
        panic!("expected an interpretation diagnostic");
    };
    assert_eq!(error.reason, InterpretationFailure::UnsupportedFormat(PixelFormat::Rgb));
}

#[test]
fn test_panicking_classifier_does_not_stop_facade() {
    let facade = threshold_facade(PanickyClassifier, 2);
    let observer = Arc::new(CollectingObserver::default());
    facade.add_observer(&observer);

    let first = facade.process_now(rgb(0, 1));
    let second = facade.process_now(rgb(255, 2));

    assert!(matches!(
        first,
        FrameOutcome::Failed(Diagnostic::WorkerPanic { ref message, .. }) if message.contains("Mock classifier panic")
    ));
    assert!(matches!(second, FrameOutcome::Published { .. }));
    assert_eq!(observer.results.lock().unwrap().len(), 1);
}

#[test]
fn test_observer_failure_is_reported_as_diagnostic() {
    let facade = threshold_facade(FixedClassifier { label: "X", confidence: 0.9 }, 2);
    let failing = Arc::new(CollectingObserver {
        should_fail: true,
        ..Default::default()
    });
    let healthy = Arc::new(CollectingObserver::default());
    let diagnostics = Arc::new(CollectingDiagnostics::default());
    facade.add_observer(&failing);
    facade.add_observer(&healthy);
    facade.add_diagnostic_observer(&diagnostics);

    facade.process_now(rgb(255, 3));

    assert_eq!(healthy.results.lock().unwrap().len(), 1);
    let reported = diagnostics.diagnostics.lock().unwrap();
    assert_eq!(reported.len(), 1);
    assert!(matches!(
        &reported[0],
        Diagnostic::ObserverFailures { failures, .. } if failures.len() == 1 && failures[0].observer == "collector"
    ));
}

#[test]
fn test_full_queue_drops_frames() {
    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = unbounded();
    let facade = threshold_facade(
        GateClassifier {
            entered: entered_tx,
            release: release_rx,
        },
        1,
    );
    let observer = Arc::new(CollectingObserver::default());
    let diagnostics = Arc::new(CollectingDiagnostics::default());
    facade.add_observer(&observer);
    facade.add_diagnostic_observer(&diagnostics);

    facade.submit_frame(rgb(255, 1));
    entered_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    facade.submit_frame(rgb(255, 2));
    facade.submit_frame(rgb(255, 3));

    assert_eq!(
        *diagnostics.diagnostics.lock().unwrap(),
        vec![Diagnostic::FrameDropped {
            timestamp: FrameTimestamp(3),
            queue_capacity: 1,
        }]
    );

    release_tx.send(()).unwrap();
    release_tx.send(()).unwrap();
    facade.shutdown();

    let timestamps: Vec<_> = observer
        .results
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.source_frame_timestamp)
        .collect();
    assert_eq!(timestamps, vec![FrameTimestamp(1), FrameTimestamp(2)]);
}

#[test]
fn test_observer_registration() {
    let facade = threshold_facade(FixedClassifier { label: "X", confidence: 0.9 }, 1);
    let observer = Arc::new(CollectingObserver::default());
    let diagnostics = Arc::new(CollectingDiagnostics::default());

    let id = facade.add_observer(&observer);
    let diag_id = facade.add_diagnostic_observer(&diagnostics);
    assert_eq!(facade.observer_count(), 1);

    assert!(facade.remove_observer(id));
    assert!(facade.remove_diagnostic_observer(diag_id));
    assert_eq!(facade.observer_count(), 0);
    assert!(!facade.remove_observer(id));
}

#[test]
fn test_from_config_rejects_invalid_config() {
    let config = InterpreterConfig::builder().canny_thresholds(10.0, 5.0).build();

    assert!(InterpreterFacade::from_config(config, FixedClassifier { label: "X", confidence: 0.9 }).is_err());
}

#[test]
fn test_with_parts_rejects_zero_capacity() {
    let interpreter = GestureInterpreter::new(FixedClassifier { label: "X", confidence: 0.9 }, 0.5).unwrap();

    assert!(InterpreterFacade::with_parts(ProcessingPipeline::new(), interpreter, 0).is_err());
}

#[test]
fn test_observer_can_reenter_facade_from_worker() {
    let facade = Arc::new(threshold_facade(FixedClassifier { label: "X", confidence: 0.9 }, 2));
    let (seen_tx, seen_rx) = unbounded();
    let observer = Arc::new(ReentrantObserver {
        facade: Mutex::new(Some(facade.clone())),
        seen: seen_tx,
    });
    facade.add_observer(&observer);

    facade.submit_frame(rgb(255, 1));
    let first = seen_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let nested = seen_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!((first, nested), (FrameTimestamp(1), FrameTimestamp(99)));

    // The worker is still alive and serving the queue.
    facade.submit_frame(rgb(255, 2));
    assert_eq!(seen_rx.recv_timeout(Duration::from_secs(5)).unwrap(), FrameTimestamp(2));
}

#[test]
fn test_stages_can_be_added_and_removed_at_runtime() {
    let interpreter = GestureInterpreter::new(FixedClassifier { label: "X", confidence: 0.9 }, 0.5).unwrap();
    let facade = InterpreterFacade::with_parts(ProcessingPipeline::new(), interpreter, 1).unwrap();
    assert!(facade.stage_names().is_empty());

    facade.add_stage(ColorThresholdProcessor::new(128));
    assert_eq!(facade.stage_names(), vec!["color_threshold"]);
    assert!(matches!(facade.process_now(rgb(255, 1)), FrameOutcome::Published { .. }));
    assert!(matches!(
        facade.process_now(yuv(2)),
        FrameOutcome::Failed(Diagnostic::Processing { ref error, .. }) if error.stage == "color_threshold"
    ));

    assert!(facade.remove_stage("color_threshold"));
    assert!(!facade.remove_stage("color_threshold"));
    assert!(facade.stage_names().is_empty());
}
