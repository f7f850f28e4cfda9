//! The logging handle handed to each interceptor.
//!
//! All lines are emitted at INFO through `tracing` and carry a `component`
//! field. Their text is fixed; log scrapers match on it:
//!
//! ```text
//! Incoming HTTP(s) request: <METHOD> <URI>. Body: <text>
//! Outgoing HTTP(s) request: <STATUS|UNKNOWN>. Body: <text>
//! Outgoing HTTP(s) request: MISSED
//! External HTTP(s) request: <METHOD> <URI>. Body: <text>
//! External HTTP(s) request: MISSED
//! External HTTP(s) response from <URI>: <STATUS>, body: <text>
//! ```

use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::info;

use crate::config::BodyLogConfig;

/// Cheaply clonable handle that formats and emits body log lines.
#[derive(Debug, Clone)]
pub struct BodyLogger {
    component: Arc<str>,
    empty_body: Arc<str>,
}

impl Default for BodyLogger {
    fn default() -> Self {
        Self::new(&BodyLogConfig::default())
    }
}

impl BodyLogger {
    /// Builds a handle from configuration.
    pub fn new(config: &BodyLogConfig) -> Self {
        Self {
            component: Arc::from(config.component.as_str()),
            empty_body: Arc::from(config.empty_body.as_str()),
        }
    }

    /// Component name attached to every event.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Renders body bytes for a log line.
    pub fn body_text<'a>(&'a self, body: &'a [u8]) -> Cow<'a, str> {
        if body.is_empty() {
            Cow::Borrowed(&*self.empty_body)
        } else {
            String::from_utf8_lossy(body)
        }
    }

    pub fn incoming_request(&self, method: &Method, uri: impl Display, body: &[u8]) {
        info!(
            component = %self.component,
            "Incoming HTTP(s) request: {} {}. Body: {}",
            method,
            uri,
            self.body_text(body)
        );
    }

    /// `status` is `None` when the tee was not tagged with a server response.
    pub fn outgoing_response(&self, status: Option<StatusCode>, body: &[u8]) {
        let status: Cow<'_, str> = match status {
            Some(status) => Cow::Owned(status.as_u16().to_string()),
            None => Cow::Borrowed("UNKNOWN"),
        };
        info!(
            component = %self.component,
            "Outgoing HTTP(s) request: {}. Body: {}",
            status,
            self.body_text(body)
        );
    }

    pub fn outgoing_missed(&self) {
        info!(component = %self.component, "Outgoing HTTP(s) request: MISSED");
    }

    pub fn external_request(&self, method: &Method, uri: &str, body: &[u8]) {
        info!(
            component = %self.component,
            "External HTTP(s) request: {} {}. Body: {}",
            method,
            uri,
            self.body_text(body)
        );
    }

    pub fn external_missed(&self) {
        info!(component = %self.component, "External HTTP(s) request: MISSED");
    }

    pub fn external_response(&self, uri: &str, status: StatusCode, body: &[u8]) {
        info!(
            component = %self.component,
            "External HTTP(s) response from {}: {}, body: {}",
            uri,
            status.as_u16(),
            self.body_text(body)
        );
    }
}
