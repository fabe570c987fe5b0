use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frame_pipeline::common::error::{ConfigError, ConfigResult};

/// Configuration for the default facade assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Lower bound of the color threshold range (inclusive)
    pub color_threshold: u8,
    /// Upper bound of the color threshold range (inclusive)
    pub color_threshold_high: u8,
    /// Canny weak-edge gradient threshold
    pub canny_low: f32,
    /// Canny strong-edge gradient threshold
    pub canny_high: f32,
    /// Minimum confidence for a gesture label to be reported
    pub min_confidence: f32,
    /// Frames that may wait for the worker before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            color_threshold: 128,
            color_threshold_high: u8::MAX,
            canny_low: 50.0,
            canny_high: 150.0,
            min_confidence: 0.6,
            queue_capacity: 4,
        }
    }
}

impl InterpreterConfig {
    pub fn builder() -> InterpreterConfigBuilder {
        InterpreterConfigBuilder::default()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &'static str, reason: String| -> ConfigResult<()> {
            Err(ConfigError::InvalidValue { field, reason })
        };

        if self.color_threshold > self.color_threshold_high {
            return invalid(
                "color_threshold",
                format!(
                    "{} exceeds color_threshold_high {}",
                    self.color_threshold, self.color_threshold_high
                ),
            );
        }
        for (field, value) in [("canny_low", self.canny_low), ("canny_high", self.canny_high)] {
            if !value.is_finite() || value < 0.0 {
                return invalid(field, format!("{value} is not a finite, non-negative number"));
            }
        }
        if self.canny_low > self.canny_high {
            return invalid(
                "canny_low",
                format!("{} exceeds canny_high {}", self.canny_low, self.canny_high),
            );
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return invalid("min_confidence", format!("{} is outside [0, 1]", self.min_confidence));
        }
        if self.queue_capacity == 0 {
            return invalid("queue_capacity", "must be at least 1".to_string());
        }
        Ok(())
    }

    /// Parses JSON, filling omitted fields from [`Default`], and validates the result.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading interpreter config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Builder for InterpreterConfig
#[derive(Default)]
pub struct InterpreterConfigBuilder {
    color_threshold: Option<u8>,
    color_threshold_high: Option<u8>,
    canny_low: Option<f32>,
    canny_high: Option<f32>,
    min_confidence: Option<f32>,
    queue_capacity: Option<usize>,
}

impl InterpreterConfigBuilder {
    pub fn color_threshold(mut self, threshold: u8) -> Self {
        self.color_threshold = Some(threshold);
        self
    }

    pub fn color_threshold_high(mut self, threshold: u8) -> Self {
        self.color_threshold_high = Some(threshold);
        self
    }

    pub fn canny_thresholds(mut self, low: f32, high: f32) -> Self {
        self.canny_low = Some(low);
        self.canny_high = Some(high);
        self
    }

    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Unset fields take their defaults. Call [`InterpreterConfig::validate`] (or let the
    /// facade do it) before use.
    pub fn build(self) -> InterpreterConfig {
        let default = InterpreterConfig::default();
        InterpreterConfig {
            color_threshold: self.color_threshold.unwrap_or(default.color_threshold),
            color_threshold_high: self.color_threshold_high.unwrap_or(default.color_threshold_high),
            canny_low: self.canny_low.unwrap_or(default.canny_low),
            canny_high: self.canny_high.unwrap_or(default.canny_high),
            min_confidence: self.min_confidence.unwrap_or(default.min_confidence),
            queue_capacity: self.queue_capacity.unwrap_or(default.queue_capacity),
        }
    }
}
