//! Camera frame module
//!
//! Immutable, validated pixel buffers as delivered by the capture source.

pub mod types;

#[cfg(test)]
mod tests;

pub use types::{Frame, FrameTimestamp, PixelFormat};
