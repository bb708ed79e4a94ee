//! Report context types - Context Extractor output
//!
//! One `ReportBundle` is assembled per dispatch and discarded when the
//! dispatch returns. All fields are explicit; nothing is read from ambient
//! process or framework state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw error handed over by the host application.
///
/// Replaces the "current exception" lookup: the host passes the error it
/// caught instead of the reporter reaching into framework globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaughtError {
    /// Classification name (e.g. "NotFoundHttpException"), if the host knows one
    pub kind: Option<String>,

    /// HTTP-style status code, if the error carries one
    pub status_code: Option<u16>,

    /// Error message
    pub message: String,

    /// Source file the error originated from
    pub file: String,

    /// Source line the error originated from
    pub line: u32,

    /// Rendered stack trace
    pub stacktrace: String,
}

impl CaughtError {
    /// Create a `CaughtError` located at the caller.
    ///
    /// Hosts that track the real origin of the error should override the
    /// location with [`with_location`](Self::with_location); the call-site
    /// default only stands in when the framework does not supply one.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind: None,
            status_code: None,
            message: message.into(),
            file: location.file().to_string(),
            line: location.line(),
            stacktrace: String::new(),
        }
    }

    /// Set the classification name
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the HTTP-style status code
    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Override the source location
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    /// Set the stack trace
    pub fn with_stacktrace(mut self, trace: impl Into<String>) -> Self {
        self.stacktrace = trace.into();
        self
    }
}

/// Captured exception context, immutable after capture.
///
/// `name` is already fully resolved (classification / configured default /
/// "Error", plus the "(#code)" suffix when a status code was present).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionContext {
    /// Resolved display name
    pub name: String,

    /// Error message (after default-message substitution)
    pub message: String,

    /// Source file
    pub file: String,

    /// Source line
    pub line: u32,

    /// Rendered stack trace
    pub stacktrace: String,
}

/// Read-only snapshot of the request the error occurred in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Query (GET) parameters, in arrival order
    #[serde(default)]
    pub query: IndexMap<String, String>,

    /// Body (POST) parameters, in arrival order
    #[serde(default)]
    pub body: IndexMap<String, String>,

    /// Request URI, if known
    #[serde(default)]
    pub request_uri: Option<String>,

    /// Referrer URL, if the client sent one
    #[serde(default)]
    pub referrer: Option<String>,

    /// User-agent header, if the client sent one
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Remote peer address
    pub remote_ip: String,
}

impl RequestContext {
    /// Create a minimal snapshot carrying only the remote address
    pub fn new(remote_ip: impl Into<String>) -> Self {
        Self {
            query: IndexMap::new(),
            body: IndexMap::new(),
            request_uri: None,
            referrer: None,
            user_agent: None,
            remote_ip: remote_ip.into(),
        }
    }

    /// Set the query parameters
    pub fn with_query(mut self, query: IndexMap<String, String>) -> Self {
        self.query = query;
        self
    }

    /// Set the body parameters
    pub fn with_body(mut self, body: IndexMap<String, String>) -> Self {
        self.body = body;
        self
    }

    /// Set the request URI
    pub fn with_request_uri(mut self, uri: impl Into<String>) -> Self {
        self.request_uri = Some(uri.into());
        self
    }

    /// Set the referrer
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Set the user-agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Attributes of the authenticated caller, absent for guests.
///
/// The attribute map is opaque to the reporter; it is rendered as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserContext {
    /// Attribute mapping, in the order the identity collaborator provided it
    pub attributes: IndexMap<String, Value>,
}

impl UserContext {
    /// Create a user context from an attribute map
    pub fn new(attributes: IndexMap<String, Value>) -> Self {
        Self { attributes }
    }
}

/// Everything one dispatch needs, bundled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    /// Captured exception
    pub exception: ExceptionContext,

    /// Request snapshot
    pub request: RequestContext,

    /// Authenticated caller, if any
    pub user: Option<UserContext>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caught_error_records_caller_location() {
        let err = CaughtError::new("boom");
        assert!(err.file.ends_with("context.rs"));
        assert!(err.line > 0);
        assert!(err.kind.is_none());
        assert!(err.status_code.is_none());
    }

    #[test]
    fn caught_error_builder_overrides() {
        let err = CaughtError::new("missing page")
            .with_kind("NotFoundHttpException")
            .with_status_code(404)
            .with_location("app/controllers/site.rs", 42)
            .with_stacktrace("#0 handler\n#1 main");
        assert_eq!(err.kind.as_deref(), Some("NotFoundHttpException"));
        assert_eq!(err.status_code, Some(404));
        assert_eq!(err.file, "app/controllers/site.rs");
        assert_eq!(err.line, 42);
    }

    #[test]
    fn request_context_preserves_parameter_order() {
        let mut query = IndexMap::new();
        query.insert("z".to_string(), "1".to_string());
        query.insert("a".to_string(), "2".to_string());
        let request = RequestContext::new("10.0.0.1").with_query(query);

        let keys: Vec<_> = request.query.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn bundle_round_trips_through_json() {
        let bundle = ReportBundle {
            exception: ExceptionContext {
                name: "Error".to_string(),
                message: "boom".to_string(),
                file: "lib.rs".to_string(),
                line: 7,
                stacktrace: "#0 main".to_string(),
            },
            request: RequestContext::new("127.0.0.1").with_request_uri("/health"),
            user: None,
        };
        let json = serde_json::to_string(&bundle).unwrap();
        let back: ReportBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(back.exception.name, "Error");
        assert_eq!(back.request.request_uri.as_deref(), Some("/health"));
    }
}
