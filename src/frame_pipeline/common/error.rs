use thiserror::Error;

use crate::frame_pipeline::frame::PixelFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid frame dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {format}")]
    BufferSizeMismatch {
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
}

/// Why a single stage rejected a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageFailure {
    #[error("unsupported input format {actual}, expected {}", join_formats(.expected))]
    UnsupportedFormat {
        expected: &'static [PixelFormat],
        actual: PixelFormat,
    },

    #[error("malformed frame: {0}")]
    InvalidFrame(#[from] FrameError),

    #[error("invalid stage parameters: {0}")]
    InvalidParameters(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Stage `{stage}` failed: {reason}")]
pub struct ProcessingError {
    pub stage: String,
    pub reason: StageFailure,
}

impl ProcessingError {
    pub fn new(stage: impl Into<String>, reason: StageFailure) -> Self {
        Self {
            stage: stage.into(),
            reason,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretationFailure {
    #[error("expected GRAYSCALE input, got {0}")]
    UnsupportedFormat(PixelFormat),

    #[error("classifier error: {0}")]
    Classifier(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Interpretation failed: {reason}")]
pub struct InterpretationError {
    pub reason: InterpretationFailure,
}

impl From<InterpretationFailure> for InterpretationError {
    fn from(reason: InterpretationFailure) -> Self {
        Self { reason }
    }
}

/// Error returned by an observer callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A non-fatal delivery failure collected while publishing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Observer `{observer}` failed: {cause}")]
pub struct ObserverFailure {
    pub observer: String,
    pub cause: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn join_formats(formats: &[PixelFormat]) -> String {
    formats
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

pub type FrameResult<T> = std::result::Result<T, FrameError>;
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;
pub type InterpretResult<T> = std::result::Result<T, InterpretationError>;
pub type ObserverResult<T = ()> = std::result::Result<T, ObserverError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
