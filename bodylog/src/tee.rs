//! Write-side stream duplication.
//!
//! # Why a tee
//!
//! Server responses and client request bodies are written by the host
//! framework *after* the interceptor has returned control. The interceptor
//! cannot drain them up front, so instead it splices a duplicating sink into
//! the write path and reads the copy once the write is over:
//!
//! ```text
//! handler ──bytes──▶ Tee ──same bytes──▶ network
//!                     │
//!                     └──copy──▶ TeeBuffer ──(after completion)──▶ log line
//! ```
//!
//! Two renditions share [`TeeBuffer`]:
//!
//! - [`TeeWriter`] wraps a blocking [`std::io::Write`] sink.
//! - [`TeeBody`] wraps an [`http_body::Body`], recording every data frame as
//!   the host pulls it towards the connection.
//!
//! Neither alters, reorders nor drops bytes. The buffer only ever holds bytes
//! that were handed to the real consumer.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes, BytesMut};
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::pin_project;

use crate::context::ExchangeContext;

/// Accumulated copy of one body write plus the exchange it belongs to.
///
/// One buffer per in-flight write. It is never reused or pooled.
#[derive(Clone)]
pub struct TeeBuffer {
    captured: BytesMut,
    context: ExchangeContext,
}

impl TeeBuffer {
    /// Creates an empty buffer bound to `context`.
    pub fn new(context: ExchangeContext) -> Self {
        Self {
            captured: BytesMut::new(),
            context,
        }
    }

    pub(crate) fn record(&mut self, bytes: &[u8]) {
        self.captured.extend_from_slice(bytes);
    }

    /// Raw bytes recorded so far.
    pub fn captured(&self) -> &[u8] {
        &self.captured
    }

    /// Recorded bytes decoded as UTF-8, invalid sequences replaced.
    ///
    /// Only reads the buffer, so repeated calls after the write completed
    /// return identical strings.
    pub fn captured_text(&self) -> String {
        String::from_utf8_lossy(&self.captured).into_owned()
    }

    /// The context supplied at construction.
    pub fn context(&self) -> &ExchangeContext {
        &self.context
    }

    /// Number of bytes recorded so far.
    pub fn len(&self) -> usize {
        self.captured.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }
}

impl fmt::Debug for TeeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: Cow<'_, str> = String::from_utf8_lossy(&self.captured);
        f.debug_struct("TeeBuffer")
            .field("captured", &preview)
            .field("context", &self.context)
            .finish()
    }
}

/// Blocking tee over a [`Write`] sink.
///
/// Every successful `write` forwards to the sink and records exactly the
/// bytes the sink accepted. A short write records only the accepted prefix,
/// so the copy never runs ahead of what the sink received.
#[derive(Debug)]
pub struct TeeWriter<W> {
    inner: W,
    buffer: TeeBuffer,
}

impl<W: Write> TeeWriter<W> {
    /// Wraps `inner`, tagging the copy with `context`.
    pub fn new(inner: W, context: ExchangeContext) -> Self {
        Self {
            inner,
            buffer: TeeBuffer::new(context),
        }
    }

    /// See [`TeeBuffer::captured_text`].
    pub fn captured_text(&self) -> String {
        self.buffer.captured_text()
    }

    /// See [`TeeBuffer::context`].
    pub fn context(&self) -> &ExchangeContext {
        self.buffer.context()
    }

    /// Reference to the wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flushes and closes the sink, releasing the copy.
    ///
    /// Dropping the writer closes both as well; this variant surfaces the
    /// flush error instead of swallowing it.
    pub fn close(mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Splits the tee into the sink and the accumulated copy.
    pub fn into_parts(self) -> (W, TeeBuffer) {
        (self.inner, self.buffer)
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.buffer.record(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Tee over an HTTP body.
///
/// Each data frame pulled from the inner body is recorded and then yielded
/// unchanged. Trailer frames pass through without being recorded. Errors
/// from the inner body are forwarded as-is.
#[pin_project]
pub struct TeeBody<B> {
    #[pin]
    inner: B,
    buffer: TeeBuffer,
}

impl<B> TeeBody<B> {
    /// Wraps `inner`, tagging the copy with `context`.
    pub fn new(inner: B, context: ExchangeContext) -> Self {
        Self {
            inner,
            buffer: TeeBuffer::new(context),
        }
    }

    /// The accumulated copy.
    pub fn buffer(&self) -> &TeeBuffer {
        &self.buffer
    }

    /// See [`TeeBuffer::captured_text`].
    pub fn captured_text(&self) -> String {
        self.buffer.captured_text()
    }

    /// See [`TeeBuffer::context`].
    pub fn context(&self) -> &ExchangeContext {
        self.buffer.context()
    }

    /// Splits the tee into the inner body and the accumulated copy.
    pub fn into_parts(self) -> (B, TeeBuffer) {
        (self.inner, self.buffer)
    }
}

impl<B> fmt::Debug for TeeBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeeBody")
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

impl<B> HttpBody for TeeBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.project();
        match this.inner.poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                if let Some(data) = frame.data_ref() {
                    this.buffer.record(data);
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
