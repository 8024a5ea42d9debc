use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// A single completed step of a flow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTrace {
    /// Seconds since the Unix epoch when the step finished.
    pub timestamp: u64,
    pub step: usize,
    pub node: String,
    pub output: String,
    pub duration: Duration,
}

/// Trait for recording flow step traces.
pub trait Telemetry: Send + Sync {
    fn record(&self, entry: StepTrace);
    fn flush(&self) {}
}

/// Simple in-memory collector for traces.
#[derive(Default)]
pub struct MemoryTelemetry {
    traces: Mutex<Vec<StepTrace>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_traces(&self) -> Vec<StepTrace> {
        self.traces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Telemetry for MemoryTelemetry {
    fn record(&self, entry: StepTrace) {
        self.traces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }
}

/// Writes every step through the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn record(&self, entry: StepTrace) {
        log::info!(
            "step {} ({}) finished in {:?}: {}",
            entry.step,
            entry.node,
            entry.duration,
            entry.output
        );
    }
}
