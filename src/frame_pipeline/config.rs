//! Interpreter configuration module
//!
//! Stage thresholds, the acceptance threshold and worker queue sizing, supplied once at
//! construction time.

mod types;


pub use types::{InterpreterConfig, InterpreterConfigBuilder};
