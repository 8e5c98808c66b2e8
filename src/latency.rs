//! Latency bookkeeping for long serial processes.
//!
//! ```
//! use filth_rust::LatencyLogger;
//!
//! let mut logger = LatencyLogger::new();
//! // ... connect ...
//! logger.latency(Some("connect"));
//! // ... query ...
//! logger.latency(Some("query"));
//!
//! let report = logger.final_latencies();
//! assert!(report.contains_key("connect"));
//! assert!(report.contains_key("total"));
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

const TOTAL: &str = "total";

/// Whole microseconds elapsed from `start` to `end`, zero if `end` is earlier.
pub fn hr_diff(start: Instant, end: Instant) -> u64 {
    end.saturating_duration_since(start)
        .as_micros()
        .min(u64::MAX as u128) as u64
}

/// Records named latencies, each measured from the previous call.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyLogger {
    #[serde(skip)]
    start: Instant,
    #[serde(skip)]
    last: Instant,
    latencies: BTreeMap<String, u64>,
}

impl LatencyLogger {
    pub fn new() -> Self {
        Self::with_latencies(BTreeMap::new())
    }

    /// Continue logging into an existing map. Any `total` entry is reset.
    pub fn with_latencies(mut latencies: BTreeMap<String, u64>) -> Self {
        let now = Instant::now();
        latencies.insert(TOTAL.to_string(), 0);
        LatencyLogger {
            start: now,
            last: now,
            latencies,
        }
    }

    /// Log the microseconds since the previous call under `name`.
    ///
    /// Repeated names accumulate. With no name nothing is logged, but the
    /// next measurement still starts now. Returns whether a value was stored.
    pub fn latency(&mut self, name: Option<&str>) -> bool {
        let then = self.last;
        let now = Instant::now();
        self.last = now;
        let Some(name) = name else {
            return false;
        };
        *self.latencies.entry(name.to_string()).or_insert(0) += hr_diff(then, now);
        true
    }

    /// Alias of [`latency`](Self::latency).
    pub fn log(&mut self, name: Option<&str>) -> bool {
        self.latency(name)
    }

    /// Fill in `total` (once) and return every logged latency.
    pub fn final_latencies(&mut self) -> &BTreeMap<String, u64> {
        let total = self.latencies.entry(TOTAL.to_string()).or_insert(0);
        if *total == 0 {
            *total = hr_diff(self.start, Instant::now());
        }
        &self.latencies
    }
}

impl Default for LatencyLogger {
    fn default() -> Self {
        Self::new()
    }
}
