use std::sync::Arc;
use std::task::{Context, Poll};

use bodylog::{InboundInterceptor, ObservedBody};
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body::Body as HttpBody;
use http_body_util::Full;
use tower::{BoxError, Service};

/// Response body produced by [`InboundLogService`].
///
/// The upstream body with a tee in its write slot. The outgoing log line is
/// emitted once the server finished writing it.
pub type LoggedBody<B> = ObservedBody<B, Arc<InboundInterceptor>>;

/// Tower service that logs request and response bodies.
///
/// The request body is read to completion before the upstream service is
/// called; upstream receives an in-memory copy. Failing to read it fails
/// the call with the body's error and upstream is never invoked.
pub struct InboundLogService<S> {
    upstream: S,
    interceptor: Arc<InboundInterceptor>,
}

impl<S> InboundLogService<S> {
    pub fn new(upstream: S, interceptor: Arc<InboundInterceptor>) -> Self {
        InboundLogService {
            upstream,
            interceptor,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.upstream
    }
}

impl<S> Clone for InboundLogService<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            interceptor: Arc::clone(&self.interceptor),
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for InboundLogService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    ReqBody: HttpBody + Send + 'static,
    ReqBody::Data: Send,
    ReqBody::Error: Into<BoxError>,
    ResBody: HttpBody,
{
    type Response = Response<LoggedBody<ResBody>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.upstream.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Keep the instance that was driven to readiness for this call.
        let clone = self.upstream.clone();
        let mut upstream = std::mem::replace(&mut self.upstream, clone);
        let interceptor = Arc::clone(&self.interceptor);

        Box::pin(async move {
            let req = interceptor.on_request_received(req).await?;
            let response = upstream.call(req).await.map_err(Into::<BoxError>::into)?;
            let response = interceptor.on_response_about_to_write(response);
            Ok::<_, BoxError>(response.map(|sink| ObservedBody::new(sink, interceptor)))
        })
    }
}
