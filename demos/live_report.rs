//! Live Report Demo
//!
//! Loads a reporter configuration file and dispatches one test error to the
//! sinks it enables. Requires reachable sink endpoints (a Redis server
//! and/or a chat API token with post rights).
//!
//! Run with: cargo run --bin live_report -- reporter.toml

use config_loader::ConfigLoader;
use contracts::{CaughtError, RequestContext};
use dispatcher::ErrorReporter;
use observability::{init_with_config, LogFormat, ObservabilityConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_with_config(ObservabilityConfig {
        log_format: LogFormat::Pretty,
        metrics_port: None,
        default_log_level: "debug".to_string(),
    })?;

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: live_report <config.toml|config.json>"))?;

    tracing::info!(path = %path, "Loading reporter config");
    let config = ConfigLoader::load_from_path(std::path::Path::new(&path))?;
    let reporter = ErrorReporter::new(config);

    let error = CaughtError::new("test dispatch from live_report demo")
        .with_kind("DemoException")
        .with_stacktrace("#0 live_report::main");
    let request = RequestContext::new("127.0.0.1").with_user_agent("live_report-demo");

    let Some(summary) = reporter.dispatch(Some(&error), request, None).await else {
        anyhow::bail!("dispatch skipped despite a supplied error");
    };

    for outcome in &summary.outcomes {
        if outcome.delivered {
            tracing::info!(sink = %outcome.sink, "Delivered");
        } else {
            tracing::warn!(
                sink = %outcome.sink,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Not delivered"
            );
        }
    }

    for (sink, snapshot) in reporter.metrics() {
        tracing::info!(
            sink = %sink,
            attempts = snapshot.attempt_count,
            delivered = snapshot.delivered_count,
            failures = snapshot.failure_count,
            "Sink metrics"
        );
    }

    Ok(())
}
