use crate::frame_pipeline::frame::Frame;
use crate::frame_pipeline::interpretation::Candidate;

/// Classification strategy used by [`GestureInterpreter`](super::GestureInterpreter).
///
/// Implementations receive frames already checked to be GRAYSCALE and must be
/// deterministic for a given frame and model state. The returned candidates need not be
/// sorted or clamped; the interpreter takes care of both.
pub trait GestureClassifier: Send {
    fn classify(&self, frame: &Frame) -> anyhow::Result<Vec<Candidate>>;
}

impl<C: GestureClassifier + ?Sized> GestureClassifier for Box<C> {
    fn classify(&self, frame: &Frame) -> anyhow::Result<Vec<Candidate>> {
        (**self).classify(frame)
    }
}
