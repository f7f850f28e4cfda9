use std::sync::Arc;

use bodylog::{BodyLogConfig, BodyLogger, InboundInterceptor};
use tower::Layer;

use crate::service::InboundLogService;

/// Tower layer adding inbound body logging to a service.
#[derive(Debug, Clone, Default)]
pub struct InboundLog {
    interceptor: Arc<InboundInterceptor>,
}

impl InboundLog {
    pub fn new(interceptor: InboundInterceptor) -> Self {
        Self {
            interceptor: Arc::new(interceptor),
        }
    }

    pub fn builder() -> InboundLogBuilder {
        InboundLogBuilder::default()
    }
}

impl<S> Layer<S> for InboundLog {
    type Service = InboundLogService<S>;

    fn layer(&self, upstream: S) -> Self::Service {
        InboundLogService::new(upstream, Arc::clone(&self.interceptor))
    }
}

/// Builder for [`InboundLog`].
///
/// An explicit [`logger`](InboundLogBuilder::logger) wins over
/// [`config`](InboundLogBuilder::config).
#[derive(Debug, Default)]
pub struct InboundLogBuilder {
    config: BodyLogConfig,
    logger: Option<BodyLogger>,
}

impl InboundLogBuilder {
    pub fn config(self, config: BodyLogConfig) -> Self {
        InboundLogBuilder { config, ..self }
    }

    /// Shares an already built logging handle.
    pub fn logger(self, logger: BodyLogger) -> Self {
        InboundLogBuilder {
            logger: Some(logger),
            ..self
        }
    }

    pub fn build(self) -> InboundLog {
        let logger = self
            .logger
            .unwrap_or_else(|| BodyLogger::new(&self.config));
        InboundLog::new(InboundInterceptor::new(logger))
    }
}
