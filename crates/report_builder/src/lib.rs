//! # Report Builder
//!
//! Context capture and report formatting.
//!
//! Responsibilities:
//! - Resolve the error display name (classification / configured default / "Error")
//! - Assemble the per-dispatch `ReportBundle`
//! - Render the fixed-layout chat-markup report (pure function)
//!
//! # Example
//!
//! ```
//! use contracts::{AppConfig, CaughtError, RequestContext};
//! use report_builder::{capture, render_report};
//!
//! let app = AppConfig {
//!     id: "my-app".to_string(),
//!     host_name: None,
//!     default_error_name: None,
//!     default_message: None,
//! };
//! let error = CaughtError::new("boom").with_stacktrace("#0 main");
//! let bundle = capture(Some(&error), RequestContext::new("10.0.0.1"), None, &app).unwrap();
//! let text = render_report(&app, &bundle);
//! assert!(text.starts_with("*_my-app_*"));
//! ```

pub mod capture;
pub mod format;
pub mod markup;

pub use capture::{capture, capture_exception, FALLBACK_ERROR_NAME};
pub use format::render_report;
