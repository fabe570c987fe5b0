use std::fmt::Write as _;
use std::time::Duration;

use tracing::debug;

/// Wall-clock time one stage spent on a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTiming {
    pub stage: String,
    pub elapsed: Duration,
}

/// Per-stage durations of one pipeline traversal, in execution order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PipelineTimings {
    stages: Vec<StageTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub(crate) fn record(&mut self, stage: &str, elapsed: Duration) {
        self.stages.push(StageTiming {
            stage: stage.to_string(),
            elapsed,
        });
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    pub fn total(&self) -> Duration {
        self.stages.iter().map(|t| t.elapsed).sum()
    }

    /// Summed over every occurrence of `stage`, or `None` if it never ran.
    pub fn elapsed_for(&self, stage: &str) -> Option<Duration> {
        self.stages
            .iter()
            .filter(|t| t.stage == stage)
            .map(|t| t.elapsed)
            .reduce(|a, b| a + b)
    }

    pub fn slowest(&self) -> Option<&StageTiming> {
        self.stages.iter().max_by_key(|t| t.elapsed)
    }

    /// One debug event per frame: total, slowest stage and the per-stage breakdown.
    pub fn log_summary(&self) {
        let mut breakdown = String::new();
        for t in &self.stages {
            let sep = if breakdown.is_empty() { "" } else { " " };
            let _ = write!(breakdown, "{sep}{}={}us", t.stage, t.elapsed.as_micros());
        }
        debug!(
            total_us = self.total().as_micros() as u64,
            slowest = self.slowest().map(|t| t.stage.as_str()).unwrap_or("-"),
            stages = %breakdown,
            "Pipeline timing"
        );
    }
}
