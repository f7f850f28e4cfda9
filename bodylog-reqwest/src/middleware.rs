//! Body logging middleware for reqwest-middleware.

use std::sync::Arc;

use async_trait::async_trait;
use bodylog::{BodyLogConfig, BodyLogger, ObservedBody, OutboundInterceptor};
use http::Extensions;
use reqwest::{Request, Response, ResponseBuilderExt, Url};
use reqwest_middleware::{Middleware, Next, Result};

/// Logs the body of every request a client sends and of every response it
/// receives.
///
/// The request line is emitted once the client has finished writing the
/// request body. The response body is read to completion and logged before
/// the caller gets the response; the caller then reads an in-memory copy.
///
/// ```ignore
/// let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
///     .with(OutboundLogMiddleware::default())
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutboundLogMiddleware {
    interceptor: Arc<OutboundInterceptor>,
}

impl OutboundLogMiddleware {
    pub fn new(interceptor: OutboundInterceptor) -> Self {
        Self {
            interceptor: Arc::new(interceptor),
        }
    }

    pub fn builder() -> OutboundLogMiddlewareBuilder {
        OutboundLogMiddlewareBuilder::default()
    }
}

#[async_trait]
impl Middleware for OutboundLogMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let uri = req.url().as_str().to_owned();

        let body = req.body_mut().take();
        if let Some(sink) = self
            .interceptor
            .on_request_about_to_send(&method, &uri, body)
        {
            let observed = ObservedBody::new(sink, Arc::clone(&self.interceptor));
            *req.body_mut() = Some(reqwest::Body::wrap(observed));
        }

        let response = next.run(req, extensions).await?;
        // The final URL, after redirects. It does not survive the conversion
        // to `http::Response`.
        let url = response.url().clone();

        let http_response: http::Response<reqwest::Body> = response.into();
        let http_response = self
            .interceptor
            .on_response_received(&uri, http_response)
            .await
            .map_err(reqwest_middleware::Error::middleware)?;

        Ok(with_url(http_response.map(reqwest::Body::wrap), url)?.into())
    }
}

/// Reattaches the response URL reqwest exposes through `Response::url`.
fn with_url(
    response: http::Response<reqwest::Body>,
    url: Url,
) -> Result<http::Response<reqwest::Body>> {
    let (parts, body) = response.into_parts();
    let mut response = http::Response::builder()
        .status(parts.status)
        .version(parts.version)
        .url(url)
        .body(body)
        .map_err(reqwest_middleware::Error::middleware)?;
    *response.headers_mut() = parts.headers;
    response.extensions_mut().extend(parts.extensions);
    Ok(response)
}

/// Builder for [`OutboundLogMiddleware`].
#[derive(Debug, Default)]
pub struct OutboundLogMiddlewareBuilder {
    config: BodyLogConfig,
    logger: Option<BodyLogger>,
}

impl OutboundLogMiddlewareBuilder {
    pub fn config(self, config: BodyLogConfig) -> Self {
        OutboundLogMiddlewareBuilder { config, ..self }
    }

    /// Shares a logging handle with other interceptors, e.g. the server
    /// side layer of the same application. Takes precedence over
    /// [`config`](OutboundLogMiddlewareBuilder::config).
    pub fn logger(self, logger: BodyLogger) -> Self {
        OutboundLogMiddlewareBuilder {
            logger: Some(logger),
            ..self
        }
    }

    pub fn build(self) -> OutboundLogMiddleware {
        let logger = self
            .logger
            .unwrap_or_else(|| BodyLogger::new(&self.config));
        OutboundLogMiddleware::new(OutboundInterceptor::new(logger))
    }
}
