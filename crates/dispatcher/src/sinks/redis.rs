//! RedisSink - durable log delivery
//!
//! Pushes one warning-level JSON record per report onto the list keyed by
//! the application identifier.

use chrono::{SecondsFormat, Utc};
use contracts::{ContractError, DurableSinkConfig, ReportSink};
use redis::aio::MultiplexedConnection;
use tracing::{debug, instrument};

/// Severity tag carried by every durable record
const RECORD_LEVEL: &str = "warning";

/// Sink that writes reports to a Redis list
pub struct RedisSink {
    name: String,
    /// List key, the application identifier
    key: String,
    connection: Option<MultiplexedConnection>,
}

impl RedisSink {
    /// Connect and authenticate per the configured connection string.
    ///
    /// Accepts `redis://host:port` directly; `tcp://host:port` strings are
    /// rewritten to the `redis` scheme. When `auth` is set an AUTH command
    /// runs before the sink is handed out.
    #[instrument(name = "redis_sink_connect", skip(config, app_id))]
    pub async fn connect(config: &DurableSinkConfig, app_id: &str) -> Result<Self, ContractError> {
        let url = normalize_url(&config.url);
        let client = redis::Client::open(url.as_str())
            .map_err(|e| ContractError::sink_connection("redis", e.to_string()))?;

        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ContractError::sink_connection("redis", e.to_string()))?;

        if let Some(auth) = &config.auth {
            redis::cmd("AUTH")
                .arg(auth)
                .query_async::<_, ()>(&mut connection)
                .await
                .map_err(|e| ContractError::sink_auth("redis", e.to_string()))?;
        }

        debug!(key = %app_id, "RedisSink connected");

        Ok(Self {
            name: "redis".to_string(),
            key: app_id.to_string(),
            connection: Some(connection),
        })
    }
}

/// Rewrite `tcp://` connection strings to the `redis://` scheme
pub(crate) fn normalize_url(url: &str) -> String {
    match url.strip_prefix("tcp://") {
        Some(rest) => format!("redis://{rest}"),
        None => url.to_string(),
    }
}

/// Build one durable record: channel, severity, payload, timestamp
pub(crate) fn build_record(app_id: &str, report: &str) -> String {
    serde_json::json!({
        "channel": app_id,
        "level": RECORD_LEVEL,
        "message": report,
        "datetime": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
    .to_string()
}

impl ReportSink for RedisSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "redis_sink_send",
        skip(self, report),
        fields(sink = %self.name, key = %self.key)
    )]
    async fn send(&mut self, report: &str) -> Result<(), ContractError> {
        let record = build_record(&self.key, report);
        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| ContractError::sink_write("redis", "connection already released"))?;

        let length: i64 = redis::cmd("RPUSH")
            .arg(&self.key)
            .arg(record)
            .query_async(connection)
            .await
            .map_err(|e| ContractError::sink_write("redis", e.to_string()))?;

        debug!(sink = %self.name, list_len = length, "Record pushed");
        Ok(())
    }

    #[instrument(name = "redis_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.connection = None;
        debug!(sink = %self.name, "RedisSink closed");
        Ok(())
    }
}
