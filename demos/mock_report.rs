//! Mock Report Demo
//!
//! Runs the capture -> render -> dispatch pipeline with both delivery sinks
//! disabled, printing the rendered report instead. Runs without Redis or a
//! chat workspace.
//!
//! Run with: cargo run --bin mock_report

use contracts::{
    AppConfig, CaughtError, ChatSinkConfig, DurableSinkConfig, ReporterConfig, RequestContext,
    UserContext,
};
use dispatcher::{deliver, ErrorReporter, LogSink};
use indexmap::IndexMap;
use observability::DispatchStats;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init()?;

    tracing::info!("Starting Mock Report Demo");

    // ==== Stage 1: Configuration, delivery sinks off ====
    let config = ReporterConfig {
        version: Default::default(),
        app: AppConfig {
            id: "demo-app".to_string(),
            host_name: None,
            default_error_name: Some("ServerError".to_string()),
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
    };
    let reporter = ErrorReporter::new(config);

    // ==== Stage 2: A sample caught error with request context ====
    let error = CaughtError::new("Page not found")
        .with_kind("NotFoundHttpException")
        .with_status_code(404)
        .with_stacktrace("#0 handle_request\n#1 router\n#2 main");

    let mut query = IndexMap::new();
    query.insert("page".to_string(), "3".to_string());
    let request = RequestContext::new("203.0.113.7")
        .with_query(query)
        .with_request_uri("/articles?page=3")
        .with_user_agent("curl/8.0");

    let mut attributes = IndexMap::new();
    attributes.insert("id".to_string(), json!(7));
    attributes.insert("name".to_string(), json!("Alice"));
    let user = UserContext::new(attributes);

    // ==== Stage 3: Dispatch ====
    let mut stats = DispatchStats::new();
    let Some(summary) = reporter.dispatch(Some(&error), request, Some(user)).await else {
        anyhow::bail!("dispatch skipped despite a supplied error");
    };

    let outcomes: Vec<(String, bool)> = summary
        .outcomes
        .iter()
        .map(|o| (o.sink.clone(), o.delivered))
        .collect();
    stats.record_report(summary.report.len(), &outcomes);

    // A dispatch with no error is a recorded no-op.
    if reporter
        .dispatch(None, RequestContext::new("203.0.113.7"), None)
        .await
        .is_none()
    {
        stats.record_skipped();
    }

    // ==== Stage 4: Show the report through a diagnostics sink ====
    let mut log_sink = LogSink::new("demo_log");
    deliver(&mut log_sink, &summary.report).await;

    println!("{}", summary.report);
    println!("{stats}");

    Ok(())
}
