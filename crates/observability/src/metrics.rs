//! Dispatch metrics collection
//!
//! Counters go to the `metrics` facade (picked up by the Prometheus
//! exporter when installed); `DispatchStats` aggregates in memory for
//! end-of-run summaries.

use metrics::{counter, histogram};
use std::collections::HashMap;

/// Record one completed dispatch
///
/// Called once per report after all sink attempts finished.
pub fn record_report_dispatched(sink_count: usize) {
    counter!("error_reporter_reports_total").increment(1);
    histogram!("error_reporter_sinks_per_report").record(sink_count as f64);
}

/// Record a dispatch that found nothing to report
pub fn record_report_skipped() {
    counter!("error_reporter_reports_skipped_total").increment(1);
}

/// Record one sink delivery attempt
pub fn record_sink_delivery(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "error_reporter_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// In-memory dispatch statistics
///
/// Aggregates outcomes for summary output, independent of the exporter.
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    /// Total reports dispatched
    pub total_reports: u64,

    /// Dispatch calls that had nothing to report
    pub total_skipped: u64,

    /// Successful deliveries per sink
    pub delivered_counts: HashMap<String, u64>,

    /// Failed deliveries per sink
    pub failure_counts: HashMap<String, u64>,

    /// Report size statistics (bytes)
    pub report_bytes: RunningStats,
}

impl DispatchStats {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one dispatched report and its per-sink outcomes
    pub fn record_report(&mut self, report_bytes: usize, outcomes: &[(String, bool)]) {
        self.total_reports += 1;
        self.report_bytes.push(report_bytes as f64);

        for (sink, delivered) in outcomes {
            let bucket = if *delivered {
                &mut self.delivered_counts
            } else {
                &mut self.failure_counts
            };
            *bucket.entry(sink.clone()).or_insert(0) += 1;
        }
    }

    /// Record a skipped dispatch
    pub fn record_skipped(&mut self) {
        self.total_skipped += 1;
    }

    /// Failure ratio across all sinks, in percent
    pub fn failure_rate(&self) -> f64 {
        let delivered: u64 = self.delivered_counts.values().sum();
        let failed: u64 = self.failure_counts.values().sum();
        let attempts = delivered + failed;
        if attempts == 0 {
            0.0
        } else {
            failed as f64 / attempts as f64 * 100.0
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl std::fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Reports dispatched: {}", self.total_reports)?;
        writeln!(f, "Dispatches skipped: {}", self.total_skipped)?;
        writeln!(f, "Failure rate: {:.2}%", self.failure_rate())?;
        writeln!(f, "Report size (bytes): {}", StatsSummary::from(&self.report_bytes))?;

        if !self.delivered_counts.is_empty() {
            writeln!(f, "Delivered per sink:")?;
            for (sink, count) in &self.delivered_counts {
                writeln!(f, "  {}: {}", sink, count)?;
            }
        }
        if !self.failure_counts.is_empty() {
            writeln!(f, "Failures per sink:")?;
            for (sink, count) in &self.failure_counts {
                writeln!(f, "  {}: {}", sink, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics snapshot
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
