//! # Integration Tests
//!
//! End-to-end tests for the capture -> render -> dispatch pipeline.
//!
//! Responsibilities:
//! - Contract snapshot tests
//! - E2E dispatch tests (no live sinks required)

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use contracts::{
        AppConfig, CaughtError, ChatSinkConfig, ConfigVersion, ContractError, DurableSinkConfig,
        ReportSink, ReporterConfig, RequestContext, UserContext,
    };
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::{deliver, ErrorReporter};
    use indexmap::IndexMap;
    use observability::DispatchStats;
    use report_builder::{capture, render_report};
    use serde_json::json;

    /// Sink that records every report it accepts
    struct CollectingSink {
        name: String,
        received: Vec<String>,
    }

    impl CollectingSink {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                received: Vec::new(),
            }
        }
    }

    impl ReportSink for CollectingSink {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send(&mut self, report: &str) -> Result<(), ContractError> {
            self.received.push(report.to_string());
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    fn offline_config() -> ReporterConfig {
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

    fn not_found_error() -> CaughtError {
        CaughtError::new("Page not found")
            .with_kind("NotFoundHttpException")
            .with_status_code(404)
            .with_location("app/handlers/site.rs", 42)
            .with_stacktrace("#0 handler\n#1 main")
    }

    /// Full scenario: 404 as a guest, empty GET/POST, no URI/referrer/UA.
    ///
    /// Verifies the whole fixed layout in one pass:
    /// 1. App identifier line first
    /// 2. Name with status suffix and message
    /// 3. Source location, then straight to the IP block
    /// 4. Guest marker, stack trace last
    #[tokio::test]
    async fn test_e2e_not_found_guest_report() {
        let reporter = ErrorReporter::new(offline_config());
        let error = not_found_error();

        let summary = reporter
            .dispatch(Some(&error), RequestContext::new("10.0.0.1"), None)
            .await
            .expect("an error was supplied");

        let report = &summary.report;
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("*_my-app_*"));
        assert_eq!(
            lines.next(),
            Some("*NotFoundHttpException (#404) - Page not found*")
        );
        assert_eq!(lines.next(), Some("`app/handlers/site.rs : 42`"));

        assert!(!report.contains("GET:"));
        assert!(!report.contains("POST:"));
        assert!(!report.contains("REQUEST URI:"));
        assert!(!report.contains("REFERRER:"));
        assert!(!report.contains("USER AGENT:"));
        assert!(report.contains("*IP:*\n```10.0.0.1```"));
        assert!(report.contains("*Guest user*"));

        let trace_at = report.find("*Stacktrace:*").unwrap();
        assert!(trace_at > report.find("*Guest user*").unwrap());
        assert!(report.ends_with("```#0 handler\n#1 main```\n\n"));

        // Both sinks disabled: formatting succeeded, nothing was contacted.
        assert!(summary.outcomes.is_empty());
        assert!(summary.fully_delivered());
    }

    /// Both sinks must be handed the exact rendered text.
    #[tokio::test]
    async fn test_e2e_sinks_receive_identical_text() {
        let config = offline_config();
        let error = not_found_error();
        let bundle = capture(
            Some(&error),
            RequestContext::new("10.0.0.1"),
            None,
            &config.app,
        )
        .unwrap();
        let report = render_report(&config.app, &bundle);

        let mut durable = CollectingSink::new("durable");
        let mut chat = CollectingSink::new("chat");
        let first = deliver(&mut durable, &report).await;
        let second = deliver(&mut chat, &report).await;

        assert!(first.delivered && second.delivered);
        assert_eq!(durable.received, vec![report.clone()]);
        assert_eq!(chat.received, vec![report]);
    }

    #[tokio::test]
    async fn test_e2e_no_error_contacts_no_sink() {
        let reporter = ErrorReporter::new(offline_config());
        let summary = reporter
            .dispatch(None, RequestContext::new("10.0.0.1"), None)
            .await;
        assert!(summary.is_none());
    }

    /// Authenticated caller: attributes section instead of the guest marker.
    #[tokio::test]
    async fn test_e2e_authenticated_report() {
        let reporter = ErrorReporter::new(offline_config());
        let error = not_found_error();

        let mut attributes = IndexMap::new();
        attributes.insert("id".to_string(), json!(7));
        attributes.insert("name".to_string(), json!("Alice"));

        let summary = reporter
            .dispatch(
                Some(&error),
                RequestContext::new("10.0.0.1"),
                Some(UserContext::new(attributes)),
            )
            .await
            .unwrap();

        assert!(summary.report.contains("*User:*\n```id: 7\nname: Alice```"));
        assert!(!summary.report.contains("Guest user"));
    }

    /// Config file -> reporter -> dispatch, end to end.
    #[tokio::test]
    async fn test_e2e_pipeline_from_config() {
        let config = ConfigLoader::load_from_str(
            r#"
[app]
id = "config-app"
host_name = "web-02"

[durable]
enabled = false

[chat]
enabled = false
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let reporter = ErrorReporter::new(config);
        let error = CaughtError::new("boom").with_stacktrace("#0 main");
        let summary = reporter
            .dispatch(Some(&error), RequestContext::new("192.168.0.9"), None)
            .await
            .unwrap();

        assert!(summary.report.starts_with("*_config-app_*"));
        assert!(summary.outcomes.is_empty());

        for (_, snapshot) in reporter.metrics() {
            assert_eq!(snapshot.attempt_count, 0);
        }

        let mut stats = DispatchStats::new();
        let outcomes: Vec<(String, bool)> = summary
            .outcomes
            .iter()
            .map(|o| (o.sink.clone(), o.delivered))
            .collect();
        stats.record_report(summary.report.len(), &outcomes);
        assert_eq!(stats.total_reports, 1);
        assert!((stats.failure_rate() - 0.0).abs() < f64::EPSILON);
    }
}
