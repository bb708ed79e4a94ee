//! SlackSink - chat channel delivery
//!
//! Posts one `chat.postMessage` call per report, tagged with a display
//! name and icon so crash posts stand out in the channel.

use contracts::{ChatSinkConfig, ContractError, ReportSink};
use serde_json::Value;
use tracing::{debug, instrument};

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Sink that posts reports to a Slack channel
pub struct SlackSink {
    name: String,
    token: String,
    channel: String,
    /// Display name the post appears under (host name or app identifier)
    username: String,
    icon: String,
    client: Option<reqwest::Client>,
}

impl SlackSink {
    /// Create a new SlackSink posting as `username`
    pub fn new(config: &ChatSinkConfig, username: impl Into<String>) -> Self {
        Self {
            name: "slack".to_string(),
            token: config.api_token.clone(),
            channel: config.channel.clone(),
            username: username.into(),
            icon: config.icon.clone(),
            client: Some(reqwest::Client::new()),
        }
    }

    /// Message body for one report
    pub(crate) fn payload(&self, report: &str) -> Value {
        serde_json::json!({
            "channel": self.channel,
            "username": self.username,
            "icon_emoji": self.icon,
            "text": report,
        })
    }
}

impl ReportSink for SlackSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "slack_sink_send",
        skip(self, report),
        fields(sink = %self.name, channel = %self.channel)
    )]
    async fn send(&mut self, report: &str) -> Result<(), ContractError> {
        let payload = self.payload(report);
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ContractError::sink_write("slack", "client already released"))?;

        let response = client
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ContractError::sink_connection("slack", e.to_string()))?
            .error_for_status()
            .map_err(|e| ContractError::sink_write("slack", e.to_string()))?;

        // The API reports application-level failure in-band.
        let body: Value = response
            .json()
            .await
            .map_err(|e| ContractError::sink_write("slack", e.to_string()))?;
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ContractError::sink_write("slack", reason));
        }

        debug!(sink = %self.name, "Message posted");
        Ok(())
    }

    #[instrument(name = "slack_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.client = None;
        debug!(sink = %self.name, "SlackSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_config() -> ChatSinkConfig {
        ChatSinkConfig {
            enabled: true,
            api_token: "xoxb-secret".to_string(),
            channel: "#crashes".to_string(),
            icon: ":smiling_imp:".to_string(),
        }
    }

    #[test]
    fn payload_carries_channel_name_icon_and_text() {
        let sink = SlackSink::new(&chat_config(), "web-01");
        let payload = sink.payload("*_my-app_*\n*Error - boom*");
        assert_eq!(payload["channel"], "#crashes");
        assert_eq!(payload["username"], "web-01");
        assert_eq!(payload["icon_emoji"], ":smiling_imp:");
        assert_eq!(payload["text"], "*_my-app_*\n*Error - boom*");
    }

    #[tokio::test]
    async fn released_client_refuses_to_send() {
        let mut sink = SlackSink::new(&chat_config(), "web-01");
        sink.close().await.unwrap();
        let result = sink.send("report").await;
        assert!(matches!(
            result,
            Err(ContractError::SinkWrite { .. })
        ));
    }
}
