//! # Dispatcher
//!
//! Report delivery module.
//!
//! Responsibilities:
//! - Deliver one rendered report to each enabled sink, in order
//! - Isolate sink failures so one outage never suppresses the other sink
//!   and never reaches the caller
//! - Expose the top-level `ErrorReporter` (capture -> render -> deliver)

pub mod dispatcher;
pub mod metrics;
pub mod reporter;
pub mod sinks;

pub use contracts::{ReportBundle, ReportSink};
pub use dispatcher::{deliver, DispatchSummary, Dispatcher, SinkOutcome};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use reporter::ErrorReporter;
pub use sinks::{LogSink, RedisSink, SlackSink};
