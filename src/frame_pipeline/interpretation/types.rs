//! Interpretation result types

use std::fmt;

use serde::Serialize;

use crate::frame_pipeline::frame::FrameTimestamp;

/// Label reported when no gesture was accepted.
pub const NO_GESTURE: &str = "none";

/// One scored label produced by a classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub label: String,
    /// Match quality in [0, 1]; higher is better
    pub confidence: f32,
}

impl Candidate {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Outcome of interpreting one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpretationResult {
    /// Accepted gesture, or `None` when nothing reached the acceptance threshold
    pub label: Option<String>,
    /// Confidence of the best candidate, in [0, 1]
    pub confidence: f32,
    /// Capture time of the frame this result was derived from
    pub source_frame_timestamp: FrameTimestamp,
}

impl InterpretationResult {
    pub fn recognized(label: impl Into<String>, confidence: f32, timestamp: FrameTimestamp) -> Self {
        Self {
            label: Some(label.into()),
            confidence,
            source_frame_timestamp: timestamp,
        }
    }

    pub fn no_gesture(confidence: f32, timestamp: FrameTimestamp) -> Self {
        Self {
            label: None,
            confidence,
            source_frame_timestamp: timestamp,
        }
    }

    pub fn is_gesture(&self) -> bool {
        self.label.is_some()
    }

    /// The label, or [`NO_GESTURE`].
    pub fn label_or_none(&self) -> &str {
        self.label.as_deref().unwrap_or(NO_GESTURE)
    }
}

impl fmt::Display for InterpretationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}) @ {}",
            self.label_or_none(),
            self.confidence,
            self.source_frame_timestamp
        )
    }
}
