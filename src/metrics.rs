// metrics.rs - per-run operation counters and timing
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Operation counters and elapsed time collected during one algorithm run.
///
/// Each algorithm call creates its own `Metrics` and returns it inside its
/// result, so two runs never share counters. Counter names are free-form
/// strings; the names used by this crate live in [`crate::config`].
///
/// Counters are kept in a `BTreeMap` so that reports list them in a stable
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    started_at: Option<Instant>,
    elapsed: Duration,
}

impl Metrics {
    /// Creates an empty instance with no counters and zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the wall-clock timer.
    pub fn start_timer(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stops the timer and records the time elapsed since [`Metrics::start_timer`].
    ///
    /// Calling this without a running timer leaves the recorded time unchanged.
    pub fn stop_timer(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.elapsed = start.elapsed();
        }
    }

    /// Time recorded by the last start/stop pair.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Adds one to the named counter.
    pub fn increment(&mut self, operation: &str) {
        self.add(operation, 1);
    }

    /// Adds `value` to the named counter, creating it at zero if needed.
    pub fn add(&mut self, operation: &str, value: u64) {
        // get_mut first so the common path does not allocate a key
        match self.counters.get_mut(operation) {
            Some(count) => *count += value,
            None => {
                self.counters.insert(operation.to_string(), value);
            }
        }
    }

    /// Current value of the named counter, `0` if it was never touched.
    pub fn counter(&self, operation: &str) -> u64 {
        self.counters.get(operation).copied().unwrap_or(0)
    }

    /// All counters in name order.
    pub fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    /// Sum of every counter; handy for quick "did anything happen" checks.
    pub fn total_operations(&self) -> u64 {
        self.counters.values().sum()
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Metrics Report ===")?;
        writeln!(
            f,
            "Execution time: {:.3} ms",
            self.elapsed.as_secs_f64() * 1_000.0
        )?;
        for (name, value) in &self.counters {
            writeln!(f, "{}: {}", name, value)?;
        }
        write!(f, "======================")
    }
}
