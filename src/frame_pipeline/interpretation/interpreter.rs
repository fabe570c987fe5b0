use std::cmp::Ordering;

use tracing::trace;

use crate::frame_pipeline::common::error::{
    ConfigError, ConfigResult, InterpretResult, InterpretationFailure,
};
use crate::frame_pipeline::frame::{Frame, PixelFormat};
use crate::frame_pipeline::interpretation::{Candidate, GestureClassifier, InterpretationResult};

/// Applies a classifier to processed frames and enforces the acceptance threshold.
pub struct GestureInterpreter {
    classifier: Box<dyn GestureClassifier>,
    min_confidence: f32,
}

impl GestureInterpreter {
    pub fn new<C: GestureClassifier + 'static>(
        classifier: C,
        min_confidence: f32,
    ) -> ConfigResult<Self> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(ConfigError::InvalidValue {
                field: "min_confidence",
                reason: format!("{min_confidence} is outside [0, 1]"),
            });
        }
        Ok(Self {
            classifier: Box::new(classifier),
            min_confidence,
        })
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// All candidates, best first. Confidences are clamped to [0, 1], non-finite scores
    /// are discarded, and ties are ordered by label.
    pub fn ranked(&self, frame: &Frame) -> InterpretResult<Vec<Candidate>> {
        if frame.format() != PixelFormat::Grayscale {
            return Err(InterpretationFailure::UnsupportedFormat(frame.format()).into());
        }

        let mut candidates: Vec<Candidate> = self
            .classifier
            .classify(frame)
            .map_err(|e| InterpretationFailure::Classifier(format!("{e:#}")))?
            .into_iter()
            .filter(|c| c.confidence.is_finite())
            .map(|c| Candidate {
                confidence: c.confidence.clamp(0.0, 1.0),
                ..c
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        Ok(candidates)
    }

    /// Best candidate if it reaches `min_confidence`, otherwise a "none" result carrying
    /// the best confidence seen.
    pub fn interpret(&self, frame: &Frame) -> InterpretResult<InterpretationResult> {
        let timestamp = frame.timestamp();
        let best = self.ranked(frame)?.into_iter().next();

        let result = match best {
            Some(c) if c.confidence >= self.min_confidence => {
                InterpretationResult::recognized(c.label, c.confidence, timestamp)
            }
            Some(c) => InterpretationResult::no_gesture(c.confidence, timestamp),
            None => InterpretationResult::no_gesture(0.0, timestamp),
        };

        trace!(label = result.label_or_none(), confidence = result.confidence, "Interpreted frame");
        Ok(result)
    }
}
