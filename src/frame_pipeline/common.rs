//! Common utilities module
//!
//! Error types shared across frames, stages, interpretation and dispatch.

pub mod error;
pub(crate) mod panic;

pub use error::{
    ConfigError,
    ConfigResult,
    FrameError,
    FrameResult,
    InterpretationError,
    InterpretationFailure,
    InterpretResult,
    ObserverError,
    ObserverFailure,
    ObserverResult,
    ProcessingError,
    ProcessingResult,
    StageFailure,
};
