//! Stock observers for logging and UI display.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::{info, warn};

use crate::frame_pipeline::common::error::{ObserverError, ObserverResult};
use crate::frame_pipeline::dispatch::{Diagnostic, DiagnosticObserver, ResultObserver};
use crate::frame_pipeline::interpretation::InterpretationResult;

/// Writes one structured log record per result.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ResultObserver for LogObserver {
    fn name(&self) -> &str {
        "log"
    }

    fn on_result(&self, result: &InterpretationResult) -> ObserverResult {
        info!(
            label = result.label_or_none(),
            confidence = result.confidence,
            timestamp_ns = result.source_frame_timestamp.as_nanos(),
            "Interpreted gesture"
        );
        Ok(())
    }
}

/// Formats results for display and hands them to the UI side over a bounded channel.
///
/// The receiving end lives wherever the UI runs. Delivery never blocks the worker: a full
/// channel (UI not draining) or a dropped receiver fails the delivery instead.
pub struct DisplayObserver {
    sender: Sender<String>,
}

impl DisplayObserver {
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }

    /// Observer plus the receiver the UI should drain. `capacity` must be at least 1.
    pub fn channel(capacity: usize) -> (Self, Receiver<String>) {
        let (tx, rx) = bounded(capacity);
        (Self::new(tx), rx)
    }

    pub fn display_text(result: &InterpretationResult) -> String {
        format!("Interpreted gesture: {}", result.label_or_none())
    }
}

impl ResultObserver for DisplayObserver {
    fn name(&self) -> &str {
        "display"
    }

    fn on_result(&self, result: &InterpretationResult) -> ObserverResult {
        self.sender
            .try_send(Self::display_text(result))
            .map_err(|e| match e {
                TrySendError::Full(_) => ObserverError::new("display queue full"),
                TrySendError::Disconnected(_) => ObserverError::new("display receiver disconnected"),
            })
    }
}

/// Logs every diagnostic at warn level.
#[derive(Debug, Default)]
pub struct LogDiagnosticObserver;

impl DiagnosticObserver for LogDiagnosticObserver {
    fn name(&self) -> &str {
        "log_diagnostics"
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) -> ObserverResult {
        warn!(timestamp_ns = diagnostic.timestamp().as_nanos(), "{diagnostic}");
        Ok(())
    }
}
