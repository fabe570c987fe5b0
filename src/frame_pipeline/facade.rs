//! Interpreter facade module
//!
//! The single entry point for capture sources and UI code: frames go in through
//! [`InterpreterFacade::submit_frame`], results and diagnostics come out through observers.

mod frame_core;
mod interpreter_facade;

#[cfg(test)]
mod tests;

pub use frame_core::FrameOutcome;
pub use interpreter_facade::InterpreterFacade;
