use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Marker logged in place of a body that carried no bytes.
pub const DEFAULT_EMPTY_BODY: &str = "<empty>";

/// Component name attached to every log event by default.
pub const DEFAULT_COMPONENT: &str = "bodylog";

/// Logging configuration shared by the inbound and outbound interceptors.
///
/// ```yaml
/// component: orders-api
/// empty_body: "<empty>"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BodyLogConfig {
    /// Value of the `component` field on every log event.
    pub component: String,
    /// Text logged for bodies with no bytes, on every log line.
    pub empty_body: String,
}

impl Default for BodyLogConfig {
    fn default() -> Self {
        Self {
            component: DEFAULT_COMPONENT.to_owned(),
            empty_body: DEFAULT_EMPTY_BODY.to_owned(),
        }
    }
}

impl BodyLogConfig {
    /// Parses a YAML document. Missing keys fall back to their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }
}
