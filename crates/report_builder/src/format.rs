//! Report formatter
//!
//! Pure rendering from `ReportBundle` to the fixed-layout text block. The
//! section order is the contract surface read by whoever watches the chat
//! channel; it never changes.

use contracts::{AppConfig, ReportBundle};

use crate::markup::{bold, bold_italic, code, dump_attributes, dump_params, fence};

/// Render one report.
///
/// Layout, in order: app identifier, name + message, source location, GET
/// params, POST params, request URI, referrer, user-agent, remote IP,
/// guest marker or user attributes, stack trace. Sections with no source
/// data are omitted entirely; IP and stack trace are always present.
///
/// Deterministic: the same bundle renders byte-identically every time.
pub fn render_report(app: &AppConfig, bundle: &ReportBundle) -> String {
    let exception = &bundle.exception;
    let request = &bundle.request;

    let mut out = String::new();

    out.push_str(&bold_italic(&app.id));
    out.push('\n');
    out.push_str(&bold(&format!("{} - {}", exception.name, exception.message)));
    out.push('\n');
    out.push_str(&code(&format!("{} : {}", exception.file, exception.line)));
    out.push_str("\n\n");

    if !request.query.is_empty() {
        push_section(&mut out, "GET", &dump_params(&request.query));
    }
    if !request.body.is_empty() {
        push_section(&mut out, "POST", &dump_params(&request.body));
    }
    if let Some(uri) = &request.request_uri {
        push_section(&mut out, "REQUEST URI", uri);
    }
    if let Some(referrer) = &request.referrer {
        push_section(&mut out, "REFERRER", referrer);
    }
    if let Some(user_agent) = &request.user_agent {
        push_section(&mut out, "USER AGENT", user_agent);
    }

    push_section(&mut out, "IP", &request.remote_ip);

    match &bundle.user {
        None => {
            out.push_str(&bold("Guest user"));
            out.push_str("\n\n");
        }
        Some(user) => {
            push_section(&mut out, "User", &dump_attributes(&user.attributes));
        }
    }

    push_section(&mut out, "Stacktrace", &exception.stacktrace);

    out
}

fn push_section(out: &mut String, label: &str, payload: &str) {
    out.push_str(&bold(&format!("{label}:")));
    out.push('\n');
    out.push_str(&fence(payload));
    out.push_str("\n\n");
}
