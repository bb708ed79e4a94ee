//! Config validation
//!
//! Rules:
//! - app.id non-empty
//! - chat enabled implies a token and a '#'-prefixed channel
//! - durable enabled implies a connection string with a supported scheme

use contracts::{ContractError, ReporterConfig};

/// Connection-string schemes the durable sink accepts
const DURABLE_SCHEMES: [&str; 2] = ["redis://", "tcp://"];

/// Validate a ReporterConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ReporterConfig) -> Result<(), ContractError> {
    validate_app(config)?;
    validate_chat(config)?;
    validate_durable(config)?;
    Ok(())
}

fn validate_app(config: &ReporterConfig) -> Result<(), ContractError> {
    if config.app.id.trim().is_empty() {
        return Err(ContractError::config_validation(
            "app.id",
            "application identifier cannot be empty",
        ));
    }
    Ok(())
}

/// Chat settings are only checked when the sink will actually be used
fn validate_chat(config: &ReporterConfig) -> Result<(), ContractError> {
    let chat = &config.chat;
    if !chat.enabled {
        return Ok(());
    }

    if chat.api_token.is_empty() {
        return Err(ContractError::config_validation(
            "chat.api_token",
            "token required when the chat sink is enabled",
        ));
    }

    if chat.channel.is_empty() {
        return Err(ContractError::config_validation(
            "chat.channel",
            "channel cannot be empty",
        ));
    }

    if !chat.channel.starts_with('#') {
        return Err(ContractError::config_validation(
            "chat.channel",
            format!("channel must start with '#', got '{}'", chat.channel),
        ));
    }

    Ok(())
}

/// Durable settings are only checked when the sink will actually be used
fn validate_durable(config: &ReporterConfig) -> Result<(), ContractError> {
    let durable = &config.durable;
    if !durable.enabled {
        return Ok(());
    }

    if durable.url.is_empty() {
        return Err(ContractError::config_validation(
            "durable.url",
            "connection string required when the durable sink is enabled",
        ));
    }

    if !DURABLE_SCHEMES
        .iter()
        .any(|scheme| durable.url.starts_with(scheme))
    {
        return Err(ContractError::config_validation(
            "durable.url",
            format!(
                "unsupported scheme in '{}', expected redis:// or tcp://",
                durable.url
            ),
        ));
    }

    Ok(())
}
