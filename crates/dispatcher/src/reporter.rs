//! ErrorReporter - the full capture -> render -> deliver operation

use contracts::{CaughtError, ReportBundle, ReporterConfig, RequestContext, UserContext};
use observability::{record_report_dispatched, record_report_skipped};
use report_builder::{capture, render_report};
use tracing::{debug, instrument};

use crate::dispatcher::{DispatchSummary, Dispatcher};
use crate::metrics::MetricsSnapshot;

/// One-stop reporter: owns the dispatcher and runs the whole pipeline for
/// each unhandled error the host hands over.
pub struct ErrorReporter {
    dispatcher: Dispatcher,
}

impl ErrorReporter {
    /// Create a reporter from an immutable configuration
    pub fn new(config: ReporterConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
        }
    }

    /// Run one dispatch.
    ///
    /// Returns `None` when `error` is `None`: nothing is formatted and no
    /// sink is contacted. Sink failures never surface here; they are
    /// recorded in the returned summary only.
    #[instrument(name = "error_reporter_dispatch", skip_all)]
    pub async fn dispatch(
        &self,
        error: Option<&CaughtError>,
        request: RequestContext,
        user: Option<UserContext>,
    ) -> Option<DispatchSummary> {
        let Some(bundle) = capture(error, request, user, self.dispatcher.app()) else {
            debug!("No error to report");
            record_report_skipped();
            return None;
        };
        Some(self.dispatch_bundle(&bundle).await)
    }

    /// Dispatch an already-assembled bundle.
    ///
    /// The report text is rendered exactly once, before any sink is
    /// constructed, so no partial report can ever be sent.
    pub async fn dispatch_bundle(&self, bundle: &ReportBundle) -> DispatchSummary {
        let report = render_report(self.dispatcher.app(), bundle);
        let outcomes = self.dispatcher.dispatch(&report).await;
        record_report_dispatched(outcomes.len());
        DispatchSummary { report, outcomes }
    }

    /// Get per-sink delivery metrics
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.dispatcher.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AppConfig, ChatSinkConfig, ConfigVersion, DurableSinkConfig};

    fn config_with_sinks_disabled() -> ReporterConfig {
        ReporterConfig {
            version: ConfigVersion::V1,
            app: AppConfig {
                id: "my-app".to_string(),
                host_name: None,
                default_error_name: None,
                default_message: None,
            },
            durable: DurableSinkConfig {
                enabled: false,
                url: String::new(),
                auth: None,
            },
            chat: ChatSinkConfig {
                enabled: false,
                ..ChatSinkConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn no_error_returns_none() {
        let reporter = ErrorReporter::new(config_with_sinks_disabled());
        let summary = reporter
            .dispatch(None, RequestContext::new("10.0.0.1"), None)
            .await;
        assert!(summary.is_none());
    }

    #[tokio::test]
    async fn disabled_sinks_still_format_successfully() {
        let reporter = ErrorReporter::new(config_with_sinks_disabled());
        let error = CaughtError::new("boom").with_stacktrace("#0 main");
        let summary = reporter
            .dispatch(Some(&error), RequestContext::new("10.0.0.1"), None)
            .await
            .unwrap();

        assert!(summary.outcomes.is_empty());
        assert!(summary.fully_delivered());
        assert!(summary.report.starts_with("*_my-app_*"));
        assert!(summary.report.contains("*Guest user*"));
    }
}
