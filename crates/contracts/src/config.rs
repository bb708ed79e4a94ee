//! ReporterConfig - Config Loader output
//!
//! Describes the full reporter setup: application identity, durable sink,
//! chat sink. Loaded once, immutable afterwards.

use serde::{Deserialize, Serialize};

/// Config schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Config schema version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Application identity and report defaults
    pub app: AppConfig,

    /// Durable (key-value store) sink
    #[serde(default)]
    pub durable: DurableSinkConfig,

    /// Chat notification sink
    #[serde(default)]
    pub chat: ChatSinkConfig,
}

/// Application identity and report defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application identifier; tags durable entries and heads every report
    pub id: String,

    /// Display name for chat delivery; falls back to the detected system
    /// hostname, then to `id`
    #[serde(default)]
    pub host_name: Option<String>,

    /// Error name used when the caught error has no classification
    #[serde(default)]
    pub default_error_name: Option<String>,

    /// Message substituted when the caught error message is empty
    #[serde(default)]
    pub default_message: Option<String>,
}

/// Durable sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurableSinkConfig {
    /// Whether the durable sink is contacted at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Connection string, `redis://host:port` or `tcp://host:port`
    #[serde(default)]
    pub url: String,

    /// Password sent via AUTH after connecting, if set
    #[serde(default)]
    pub auth: Option<String>,
}

impl Default for DurableSinkConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: String::new(),
            auth: None,
        }
    }
}

/// Chat sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSinkConfig {
    /// Whether the chat sink is contacted at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// API token for the chat service
    #[serde(default)]
    pub api_token: String,

    /// Channel the report is posted to
    #[serde(default = "default_chat_channel")]
    pub channel: String,

    /// Icon emoji attached to the posted message
    #[serde(default = "default_chat_icon")]
    pub icon: String,
}

impl Default for ChatSinkConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_token: String::new(),
            channel: default_chat_channel(),
            icon: default_chat_icon(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_chat_channel() -> String {
    "#crashes".to_string()
}

fn default_chat_icon() -> String {
    ":smiling_imp:".to_string()
}
