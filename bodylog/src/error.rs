use thiserror::Error;

/// Boxed error type used for body read failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A body could not be read to completion.
///
/// Fatal for the current exchange. The source error is the one produced by
/// the body, unmodified.
#[derive(Debug, Error)]
#[error("failed to read body to completion")]
pub struct CaptureError {
    #[source]
    source: BoxError,
}

impl CaptureError {
    pub(crate) fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Unwraps the error produced by the body.
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document is malformed or does not match the schema.
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_saphyr::Error),
}
