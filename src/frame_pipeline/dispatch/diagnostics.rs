use std::fmt;
use std::sync::{Arc, Weak};

use crate::frame_pipeline::common::error::{InterpretationError, ObserverFailure, ProcessingError};
use crate::frame_pipeline::dispatch::registry::{PublishReport, Registry};
use crate::frame_pipeline::dispatch::{DiagnosticObserver, ObserverId};
use crate::frame_pipeline::frame::FrameTimestamp;

/// A non-fatal problem encountered while handling one frame
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A pipeline stage rejected the frame
    Processing {
        timestamp: FrameTimestamp,
        error: ProcessingError,
    },
    /// The interpreter rejected the processed frame
    Interpretation {
        timestamp: FrameTimestamp,
        error: InterpretationError,
    },
    /// The frame arrived while the work queue was full and was discarded
    FrameDropped {
        timestamp: FrameTimestamp,
        queue_capacity: usize,
    },
    /// Some result observers failed while the frame's result was published
    ObserverFailures {
        timestamp: FrameTimestamp,
        failures: Vec<ObserverFailure>,
    },
    /// A stage or classifier panicked while handling the frame
    WorkerPanic {
        timestamp: FrameTimestamp,
        message: String,
    },
}

impl Diagnostic {
    pub fn timestamp(&self) -> FrameTimestamp {
        match self {
            Diagnostic::Processing { timestamp, .. }
            | Diagnostic::Interpretation { timestamp, .. }
            | Diagnostic::FrameDropped { timestamp, .. }
            | Diagnostic::ObserverFailures { timestamp, .. }
            | Diagnostic::WorkerPanic { timestamp, .. } => *timestamp,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Processing { timestamp, error } => {
                write!(f, "frame @ {timestamp}: {error}")
            }
            Diagnostic::Interpretation { timestamp, error } => {
                write!(f, "frame @ {timestamp}: {error}")
            }
            Diagnostic::FrameDropped {
                timestamp,
                queue_capacity,
            } => write!(
                f,
                "frame @ {timestamp}: dropped, work queue full ({queue_capacity} pending)"
            ),
            Diagnostic::ObserverFailures {
                timestamp,
                failures,
            } => {
                write!(f, "frame @ {timestamp}: {} observer(s) failed", failures.len())?;
                for failure in failures {
                    write!(f, "; {failure}")?;
                }
                Ok(())
            }
            Diagnostic::WorkerPanic { timestamp, message } => {
                write!(f, "frame @ {timestamp}: worker panicked: {message}")
            }
        }
    }
}

/// The facade's error channel, kept apart from regular results.
pub struct DiagnosticDispatcher {
    registry: Registry<dyn DiagnosticObserver>,
}

impl Default for DiagnosticDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticDispatcher {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    pub fn subscribe<T: DiagnosticObserver + 'static>(&self, observer: &Arc<T>) -> ObserverId {
        let weak: Weak<T> = Arc::downgrade(observer);
        let weak: Weak<dyn DiagnosticObserver> = weak;
        self.registry.subscribe(weak)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.registry.unsubscribe(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Same delivery rules as [`ResultDispatcher::publish`](super::ResultDispatcher::publish).
    /// Failures here are only logged; they are never turned into further diagnostics.
    pub fn publish(&self, diagnostic: &Diagnostic) -> PublishReport {
        self.registry.publish_with(
            |o| o.name().to_string(),
            |o| o.on_diagnostic(diagnostic),
        )
    }
}
