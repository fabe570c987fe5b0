//! Frame processing and gesture interpretation core
//!
//! Camera frames flow through an ordered chain of image-processing stages, the processed
//! frame is classified into a gesture label, and the result is fanned out to registered
//! observers. [`InterpreterFacade`] ties the pieces together behind a single entry point.

pub mod common;
pub mod frame;
pub mod processing;
pub mod interpretation;
pub mod dispatch;
pub mod config;
pub mod facade;

pub use common::{
    FrameError,
    FrameResult,
    ProcessingError,
    ProcessingResult,
    StageFailure,
    InterpretationError,
    InterpretationFailure,
    InterpretResult,
    ObserverError,
    ObserverFailure,
    ObserverResult,
    ConfigError,
    ConfigResult,
};

pub use frame::{
    Frame,
    FrameTimestamp,
    PixelFormat,
};

pub use processing::{
    FrameProcessor,
    ProcessingPipeline,
    ColorThresholdProcessor,
    CannyEdgeProcessor,
    GrayscaleProcessor,
    PipelineTimings,
    StageTiming,
};

pub use interpretation::{
    Candidate,
    GestureClassifier,
    GestureInterpreter,
    InterpretationResult,
    NO_GESTURE,
    TemplateClassifier,
    TemplateClassifierBuilder,
};

pub use dispatch::{
    Diagnostic,
    DiagnosticDispatcher,
    DiagnosticObserver,
    DisplayObserver,
    LogDiagnosticObserver,
    LogObserver,
    ObserverId,
    PublishReport,
    ResultDispatcher,
    ResultObserver,
};

pub use config::{
    InterpreterConfig,
    InterpreterConfigBuilder,
};

pub use facade::{
    FrameOutcome,
    InterpreterFacade,
};
