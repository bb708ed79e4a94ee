//! ReportSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for delivery sinks.

use crate::ContractError;

/// Report delivery trait
///
/// All sink implementations must implement this trait. Sinks are created
/// fresh for one dispatch and closed afterwards, success or not.
#[trait_variant::make(ReportSink: Send)]
pub trait LocalReportSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one formatted report
    ///
    /// # Errors
    /// Returns delivery error (should include context)
    async fn send(&mut self, report: &str) -> Result<(), ContractError>;

    /// Release the sink's resources
    async fn close(&mut self) -> Result<(), ContractError>;
}
