//! Chat-markup helpers
//!
//! The report targets chat-message markup: `*bold*`, `*_bold italic_*`,
//! backtick code spans and triple-backtick fences.

use indexmap::IndexMap;
use serde_json::Value;

/// Wrap in `*bold*`
pub fn bold(text: &str) -> String {
    format!("*{text}*")
}

/// Wrap in `*_bold italic_*`
pub fn bold_italic(text: &str) -> String {
    format!("*_{text}_*")
}

/// Wrap in a backtick code span
pub fn code(text: &str) -> String {
    format!("`{text}`")
}

/// Wrap in a triple-backtick fence
pub fn fence(text: &str) -> String {
    format!("```{text}```")
}

/// Render a string map as `key: value` lines
pub fn dump_params(params: &IndexMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an attribute map as `key: value` lines
///
/// String values are rendered bare; everything else in its JSON form.
pub fn dump_attributes(attributes: &IndexMap<String, Value>) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!("{key}: {}", render_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
