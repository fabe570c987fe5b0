//! Gesture interpretation module
//!
//! Turns a processed GRAYSCALE frame into a gesture label, delegating the actual
//! classification to a pluggable [`GestureClassifier`].

mod types;
mod classifier;
mod template_classifier;
mod interpreter;


pub use types::{Candidate, InterpretationResult, NO_GESTURE};
pub use classifier::GestureClassifier;
pub use template_classifier::{TemplateClassifier, TemplateClassifierBuilder};
pub use interpreter::GestureInterpreter;
