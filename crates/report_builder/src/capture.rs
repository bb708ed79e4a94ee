//! Context capture
//!
//! Turns the host-supplied error/request/user state into an immutable
//! `ReportBundle`, or signals "nothing to report".

use contracts::{
    AppConfig, CaughtError, ExceptionContext, ReportBundle, RequestContext, UserContext,
};
use tracing::debug;

/// Display name used when neither the error nor the config names one
pub const FALLBACK_ERROR_NAME: &str = "Error";

/// Build the exception context for one dispatch.
///
/// Returns `None` when there is no current error; the dispatcher takes no
/// further action and no sinks are contacted.
///
/// Name resolution: the error's classification if present, else the
/// configured `default_error_name`, else [`FALLBACK_ERROR_NAME`]. A status
/// code appends `" (#<code>)"` to the resolved name.
pub fn capture_exception(error: Option<&CaughtError>, app: &AppConfig) -> Option<ExceptionContext> {
    let error = error?;

    let mut name = error
        .kind
        .clone()
        .or_else(|| app.default_error_name.clone())
        .unwrap_or_else(|| FALLBACK_ERROR_NAME.to_string());

    if let Some(code) = error.status_code {
        name = format!("{name} (#{code})");
    }

    // Empty messages fall back to the configured default, if any.
    let message = if error.message.is_empty() {
        app.default_message.clone().unwrap_or_default()
    } else {
        error.message.clone()
    };

    debug!(name = %name, file = %error.file, line = error.line, "Exception captured");

    Some(ExceptionContext {
        name,
        message,
        file: error.file.clone(),
        line: error.line,
        stacktrace: error.stacktrace.clone(),
    })
}

/// Assemble the full bundle for one dispatch.
///
/// `user` is `None` for unauthenticated callers; that is the guest path,
/// not an error.
pub fn capture(
    error: Option<&CaughtError>,
    request: RequestContext,
    user: Option<UserContext>,
    app: &AppConfig,
) -> Option<ReportBundle> {
    let exception = capture_exception(error, app)?;
    Some(ReportBundle {
        exception,
        request,
        user,
    })
}
