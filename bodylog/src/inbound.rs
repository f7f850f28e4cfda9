//! Server-side interceptor.
//!
//! One exchange moves through these steps:
//!
//! ```text
//! RECEIVED ─▶ BODY_CAPTURED ─▶ LOGGED_REQUEST ─▶ WRITING_RESPONSE ─▶ LOGGED_RESPONSE
//!    on_request_received ──────────┘                  │                   │
//!    on_response_about_to_write ──────────────────────┘                   │
//!    body_written (via ObservedBody) ─────────────────────────────────────┘
//! ```
//!
//! The request is read here, before the handler runs, so it is captured and
//! replaced. The response is written by the host after this interceptor
//! returned, so a tee goes into its write slot instead.

use bytes::Bytes;
use http::header::HOST;
use http::{Request, Response};
use http_body::Body as HttpBody;
use http_body_util::Full;

use crate::capture::capture_request;
use crate::context::ExchangeContext;
use crate::error::{BoxError, CaptureError};
use crate::logger::BodyLogger;
use crate::sink::{BodyWriteHook, WriteSink, WrittenSink};

/// Logs bodies of requests received and responses written by a server.
#[derive(Debug, Clone, Default)]
pub struct InboundInterceptor {
    logger: BodyLogger,
}

impl InboundInterceptor {
    pub fn new(logger: BodyLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &BodyLogger {
        &self.logger
    }

    /// Captures and logs the request body, handing back a request whose
    /// body is an in-memory copy of the original.
    ///
    /// A body that cannot be read fails the exchange; nothing is logged.
    pub async fn on_request_received<B>(
        &self,
        request: Request<B>,
    ) -> Result<Request<Full<Bytes>>, CaptureError>
    where
        B: HttpBody,
        B::Error: Into<BoxError>,
    {
        let (request, captured) = capture_request(request).await?;
        let uri = absolute_uri(&request);
        self.logger
            .incoming_request(request.method(), uri, captured.bytes());
        Ok(request)
    }

    /// Puts a tee into the response's write slot, tagged with its status.
    pub fn on_response_about_to_write<B>(&self, response: Response<B>) -> Response<WriteSink<B>> {
        let context = ExchangeContext::server_response(response.status());
        response.map(|body| WriteSink::tee(body, context))
    }
}

/// The request URI in absolute form.
///
/// Servers receive origin-form URIs (`/orders?id=7`); the authority comes
/// from the `Host` header and the scheme defaults to `http`. Without a
/// `Host` header the URI is rendered as received.
fn absolute_uri<B>(request: &Request<B>) -> String {
    let uri = request.uri();
    if uri.authority().is_some() {
        return uri.to_string();
    }
    let host = request
        .headers()
        .get(HOST)
        .and_then(|host| host.to_str().ok());
    match host {
        Some(host) => {
            let scheme = uri.scheme_str().unwrap_or("http");
            let path = uri.path_and_query().map_or("/", |path| path.as_str());
            format!("{scheme}://{host}{path}")
        }
        None => uri.to_string(),
    }
}

impl BodyWriteHook for InboundInterceptor {
    fn body_written(&self, sink: WrittenSink<'_>) {
        match sink {
            WrittenSink::Tee(buffer) => {
                let status = buffer
                    .context()
                    .as_server_response()
                    .map(|response| response.status());
                self.logger.outgoing_response(status, buffer.captured());
            }
            WrittenSink::Plain => self.logger.outgoing_missed(),
        }
    }
}
