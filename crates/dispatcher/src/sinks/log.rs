//! LogSink - writes a report summary through tracing
//!
//! Not one of the two configured delivery sinks; used by demos and tests
//! where network delivery is unwanted.

use contracts::{ContractError, ReportSink};
use tracing::{info, instrument};

/// Sink that logs report summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_report_summary(&self, report: &str) {
        let headline = report.lines().next().unwrap_or_default();

        info!(
            sink = %self.name,
            bytes = report.len(),
            lines = report.lines().count(),
            headline = %headline,
            "Report received"
        );
    }
}

impl ReportSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_send",
        skip(self, report),
        fields(sink = %self.name, bytes = report.len())
    )]
    async fn send(&mut self, report: &str) -> Result<(), ContractError> {
        self.log_report_summary(report);
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
