//! Client-side interceptor, the mirror image of [`crate::inbound`].
//!
//! The outgoing request body is written by the client after this
//! interceptor returned, so it gets a tee. The downstream response is read
//! here before the caller sees it, so it is captured and replaced.

use bytes::Bytes;
use http::{Method, Response};
use http_body::Body as HttpBody;
use http_body_util::Full;

use crate::capture::capture_response;
use crate::context::ExchangeContext;
use crate::error::{BoxError, CaptureError};
use crate::logger::BodyLogger;
use crate::sink::{BodyWriteHook, WriteSink, WrittenSink};

/// Logs bodies of requests sent to, and responses received from, a
/// downstream system.
#[derive(Debug, Clone, Default)]
pub struct OutboundInterceptor {
    logger: BodyLogger,
}

impl OutboundInterceptor {
    pub fn new(logger: BodyLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &BodyLogger {
        &self.logger
    }

    /// Puts a tee into the request's write slot.
    ///
    /// A request without a body has nothing to write: it is logged right
    /// away with the empty-body marker and no tee is installed.
    pub fn on_request_about_to_send<B>(
        &self,
        method: &Method,
        uri: &str,
        body: Option<B>,
    ) -> Option<WriteSink<B>> {
        match body {
            Some(body) => Some(WriteSink::tee(
                body,
                ExchangeContext::client_request(method.clone(), uri),
            )),
            None => {
                self.logger.external_request(method, uri, &[]);
                None
            }
        }
    }

    /// Captures and logs the downstream response body, handing back a
    /// response whose body is an in-memory copy of the original.
    pub async fn on_response_received<B>(
        &self,
        uri: &str,
        response: Response<B>,
    ) -> Result<Response<Full<Bytes>>, CaptureError>
    where
        B: HttpBody,
        B::Error: Into<BoxError>,
    {
        let (response, captured) = capture_response(response).await?;
        self.logger
            .external_response(uri, response.status(), captured.bytes());
        Ok(response)
    }
}

impl BodyWriteHook for OutboundInterceptor {
    fn body_written(&self, sink: WrittenSink<'_>) {
        let WrittenSink::Tee(buffer) = sink else {
            self.logger.external_missed();
            return;
        };
        match buffer.context().as_client_request() {
            Some(request) => {
                self.logger
                    .external_request(request.method(), request.uri(), buffer.captured())
            }
            None => self.logger.external_missed(),
        }
    }
}
