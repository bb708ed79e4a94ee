//! Dispatcher - best-effort delivery to the configured sinks
//!
//! Each sink attempt runs inside its own failure boundary: a sink outage is
//! logged and counted, the remaining sinks are still tried, and nothing
//! propagates to the caller. The reporter is the last-resort error path and
//! must degrade silently.

use contracts::{AppConfig, ContractError, ReportSink, ReporterConfig};
use observability::record_sink_delivery;
use tracing::{debug, info, instrument, warn};

use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::sinks::{RedisSink, SlackSink};

/// Outcome of one sink attempt
#[derive(Debug, Clone)]
pub struct SinkOutcome {
    /// Sink name
    pub sink: String,

    /// Whether the report reached the sink
    pub delivered: bool,

    /// Failure description, when not delivered
    pub error: Option<String>,
}

impl SinkOutcome {
    fn success(sink: impl Into<String>) -> Self {
        Self {
            sink: sink.into(),
            delivered: true,
            error: None,
        }
    }

    fn failure(sink: impl Into<String>, error: &ContractError) -> Self {
        Self {
            sink: sink.into(),
            delivered: false,
            error: Some(error.to_string()),
        }
    }
}

/// Result of one dispatch: the rendered report plus per-sink outcomes
#[derive(Debug, Clone)]
pub struct DispatchSummary {
    /// The exact text every enabled sink was handed
    pub report: String,

    /// One entry per enabled sink, in delivery order
    pub outcomes: Vec<SinkOutcome>,
}

impl DispatchSummary {
    /// True when every enabled sink accepted the report
    pub fn fully_delivered(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.delivered)
    }
}

/// Delivers rendered reports to the durable and chat sinks
pub struct Dispatcher {
    config: ReporterConfig,
    /// Display name for chat delivery (host name fallback chain)
    display_name: String,
    durable_metrics: SinkMetrics,
    chat_metrics: SinkMetrics,
}

impl Dispatcher {
    /// Create a dispatcher from an immutable configuration
    pub fn new(config: ReporterConfig) -> Self {
        let display_name = resolve_display_name(&config.app);
        Self {
            config,
            display_name,
            durable_metrics: SinkMetrics::new(),
            chat_metrics: SinkMetrics::new(),
        }
    }

    /// Application section of the configuration
    pub fn app(&self) -> &AppConfig {
        &self.config.app
    }

    /// Display name chat posts appear under
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        vec![
            ("redis".to_string(), self.durable_metrics.snapshot()),
            ("slack".to_string(), self.chat_metrics.snapshot()),
        ]
    }

    /// Deliver `report` to each enabled sink, durable first, then chat.
    ///
    /// Sequential single-pass: one attempt per sink, no retry, fresh client
    /// per call. With both sinks disabled this returns an empty list and no
    /// network traffic occurs.
    #[instrument(name = "dispatcher_dispatch", skip(self, report), fields(bytes = report.len()))]
    pub async fn dispatch(&self, report: &str) -> Vec<SinkOutcome> {
        let mut outcomes = Vec::new();

        if self.config.durable.enabled {
            outcomes.push(self.deliver_durable(report).await);
        } else {
            debug!(sink = "redis", "Sink disabled, skipping");
        }

        if self.config.chat.enabled {
            outcomes.push(self.deliver_chat(report).await);
        } else {
            debug!(sink = "slack", "Sink disabled, skipping");
        }

        info!(
            sinks = outcomes.len(),
            delivered = outcomes.iter().filter(|o| o.delivered).count(),
            "Dispatch complete"
        );

        outcomes
    }

    async fn deliver_durable(&self, report: &str) -> SinkOutcome {
        self.durable_metrics.inc_attempt_count();
        let outcome = match RedisSink::connect(&self.config.durable, &self.config.app.id).await {
            Ok(mut sink) => deliver(&mut sink, report).await,
            Err(e) => {
                warn!(sink = "redis", error = %e, "Sink unavailable");
                SinkOutcome::failure("redis", &e)
            }
        };
        self.record(&self.durable_metrics, &outcome);
        outcome
    }

    async fn deliver_chat(&self, report: &str) -> SinkOutcome {
        self.chat_metrics.inc_attempt_count();
        let mut sink = SlackSink::new(&self.config.chat, self.display_name.clone());
        let outcome = deliver(&mut sink, report).await;
        self.record(&self.chat_metrics, &outcome);
        outcome
    }

    fn record(&self, metrics: &SinkMetrics, outcome: &SinkOutcome) {
        if outcome.delivered {
            metrics.inc_delivered_count();
        } else {
            metrics.inc_failure_count();
        }
        record_sink_delivery(&outcome.sink, outcome.delivered);
    }
}

/// Display name fallback chain: configured host name, detected system
/// hostname, application identifier.
fn resolve_display_name(app: &AppConfig) -> String {
    app.host_name
        .clone()
        .or_else(|| hostname::get().ok().and_then(|name| name.into_string().ok()))
        .unwrap_or_else(|| app.id.clone())
}

/// Run one sink attempt inside its own failure boundary.
///
/// The sink is closed whatever the send result was, so per-dispatch client
/// resources are released on both paths.
pub async fn deliver<S: ReportSink>(sink: &mut S, report: &str) -> SinkOutcome {
    let name = sink.name().to_string();
    let result = sink.send(report).await;

    if let Err(e) = sink.close().await {
        warn!(sink = %name, error = %e, "Close failed");
    }

    match result {
        Ok(()) => {
            info!(sink = %name, "Report delivered");
            SinkOutcome::success(name)
        }
        Err(e) => {
            warn!(sink = %name, error = %e, "Delivery failed");
            SinkOutcome::failure(name, &e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ChatSinkConfig, ConfigVersion, DurableSinkConfig};

    /// Mock sink for testing
    struct MockSink {
        name: String,
        should_fail: bool,
        sent: Vec<String>,
        closed: bool,
    }

    impl MockSink {
        fn new(name: &str, should_fail: bool) -> Self {
            Self {
                name: name.to_string(),
                should_fail,
                sent: Vec::new(),
                closed: false,
            }
        }
    }

    impl ReportSink for MockSink {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send(&mut self, report: &str) -> Result<(), ContractError> {
            if self.should_fail {
                return Err(ContractError::sink_write(&self.name, "mock failure"));
            }
            self.sent.push(report.to_string());
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            self.closed = true;
            Ok(())
        }
    }

    fn disabled_config() -> ReporterConfig {
        ReporterConfig {
            version: ConfigVersion::V1,
            app: AppConfig {
                id: "my-app".to_string(),
                host_name: Some("web-01".to_string()),
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
    async fn disabled_sinks_mean_zero_attempts() {
        let dispatcher = Dispatcher::new(disabled_config());
        let outcomes = dispatcher.dispatch("*_my-app_*").await;
        assert!(outcomes.is_empty());
        for (_, snapshot) in dispatcher.metrics() {
            assert_eq!(snapshot.attempt_count, 0);
        }
    }

    #[tokio::test]
    async fn deliver_closes_sink_on_success() {
        let mut sink = MockSink::new("mock", false);
        let outcome = deliver(&mut sink, "report text").await;
        assert!(outcome.delivered);
        assert!(sink.closed);
        assert_eq!(sink.sent, vec!["report text"]);
    }

    #[tokio::test]
    async fn deliver_closes_sink_on_failure() {
        let mut sink = MockSink::new("mock", true);
        let outcome = deliver(&mut sink, "report text").await;
        assert!(!outcome.delivered);
        assert!(outcome.error.unwrap().contains("mock failure"));
        assert!(sink.closed);
    }

    #[tokio::test]
    async fn one_failing_sink_does_not_block_the_next() {
        // Mirrors the dispatch loop: the durable attempt fails, the chat
        // attempt must still happen and succeed.
        let mut failing = MockSink::new("first", true);
        let mut healthy = MockSink::new("second", false);

        let first = deliver(&mut failing, "report text").await;
        let second = deliver(&mut healthy, "report text").await;

        assert!(!first.delivered);
        assert!(second.delivered);
        assert_eq!(healthy.sent, vec!["report text"]);
    }

    #[test]
    fn display_name_prefers_configured_host() {
        let config = disabled_config();
        let dispatcher = Dispatcher::new(config);
        assert_eq!(dispatcher.display_name(), "web-01");
    }

    #[test]
    fn display_name_falls_back_without_config() {
        let mut config = disabled_config();
        config.app.host_name = None;
        let dispatcher = Dispatcher::new(config);
        // Detected hostname or the app id; never empty either way.
        assert!(!dispatcher.display_name().is_empty());
    }

    #[test]
    fn summary_fully_delivered() {
        let summary = DispatchSummary {
            report: "text".to_string(),
            outcomes: vec![
                SinkOutcome::success("redis"),
                SinkOutcome::failure("slack", &ContractError::sink_write("slack", "down")),
            ],
        };
        assert!(!summary.fully_delivered());
    }
}
