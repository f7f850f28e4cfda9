//! Read-side body capture.
//!
//! Server requests and client responses are read by the interceptor itself
//! before anyone else sees them, so they can simply be drained into memory
//! and replaced by an in-memory body over the same bytes. Consumers after
//! the interceptor read an equivalent body and never notice the swap.
//!
//! The source body is consumed by value: it is dropped once drained, on
//! success and on failure alike. A failed read installs nothing and
//! returns no partial text.

use bytes::Bytes;
use http::{Request, Response};
use http_body::Body as HttpBody;
use http_body_util::{BodyExt, Full};

use crate::error::{BoxError, CaptureError};

/// A body drained into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedBody {
    bytes: Bytes,
}

impl CapturedBody {
    /// The captured bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The captured bytes decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Whether the body carried no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A fresh, re-readable body over the captured bytes.
    pub fn to_body(&self) -> Full<Bytes> {
        Full::new(self.bytes.clone())
    }

    /// Converts into a fresh body over the captured bytes.
    pub fn into_body(self) -> Full<Bytes> {
        Full::new(self.bytes)
    }
}

/// Drains `body` to completion.
pub async fn capture_body<B>(body: B) -> Result<CapturedBody, CaptureError>
where
    B: HttpBody,
    B::Error: Into<BoxError>,
{
    let collected = body.collect().await.map_err(CaptureError::new)?;
    Ok(CapturedBody {
        bytes: collected.to_bytes(),
    })
}

/// Drains the request body and rebuilds the request around an in-memory copy.
pub async fn capture_request<B>(
    request: Request<B>,
) -> Result<(Request<Full<Bytes>>, CapturedBody), CaptureError>
where
    B: HttpBody,
    B::Error: Into<BoxError>,
{
    let (parts, body) = request.into_parts();
    let captured = capture_body(body).await?;
    Ok((Request::from_parts(parts, captured.to_body()), captured))
}

/// Drains the response body and rebuilds the response around an in-memory copy.
pub async fn capture_response<B>(
    response: Response<B>,
) -> Result<(Response<Full<Bytes>>, CapturedBody), CaptureError>
where
    B: HttpBody,
    B::Error: Into<BoxError>,
{
    let (parts, body) = response.into_parts();
    let captured = capture_body(body).await?;
    Ok((Response::from_parts(parts, captured.to_body()), captured))
}
