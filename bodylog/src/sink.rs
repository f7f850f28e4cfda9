//! The body write slot and write-completion observation.
//!
//! The host framework writes whatever body occupies the write slot. An
//! interceptor installs a tee there ahead of time, but anything running
//! between installation and the write may put something else in the slot.
//! [`WriteSink`] makes the two possibilities explicit, and the check made
//! after the write is a `match`, not a guess about the body's type.
//!
//! [`ObservedBody`] is the "around body write" hook: it drives the sink for
//! the host and, once the write has completed, hands the sink to a
//! [`BodyWriteHook`] exactly once.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::{pin_project, pinned_drop};

use crate::context::ExchangeContext;
use crate::tee::{TeeBody, TeeBuffer};

/// Body occupying the write slot of a response or outgoing request.
#[pin_project(project = WriteSinkProj)]
#[derive(Debug)]
pub enum WriteSink<B> {
    /// A tee installed by an interceptor.
    Tee(#[pin] TeeBody<B>),
    /// A body nobody is duplicating.
    Plain(#[pin] B),
}

impl<B> WriteSink<B> {
    /// Installs a tee around `body`.
    pub fn tee(body: B, context: ExchangeContext) -> Self {
        WriteSink::Tee(TeeBody::new(body, context))
    }

    /// Leaves `body` as is.
    pub fn plain(body: B) -> Self {
        WriteSink::Plain(body)
    }

    /// Whether a tee occupies the slot.
    pub fn is_tee(&self) -> bool {
        matches!(self, WriteSink::Tee(_))
    }

    /// What the write-completion hook gets to see.
    pub fn written(&self) -> WrittenSink<'_> {
        match self {
            WriteSink::Tee(tee) => WrittenSink::Tee(tee.buffer()),
            WriteSink::Plain(_) => WrittenSink::Plain,
        }
    }

    /// Drops any installed tee and returns the original body.
    pub fn into_inner(self) -> B {
        match self {
            WriteSink::Tee(tee) => tee.into_parts().0,
            WriteSink::Plain(body) => body,
        }
    }
}

impl<B> HttpBody for WriteSink<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            WriteSinkProj::Tee(tee) => tee.poll_frame(cx),
            WriteSinkProj::Plain(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            WriteSink::Tee(tee) => tee.is_end_stream(),
            WriteSink::Plain(body) => body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            WriteSink::Tee(tee) => tee.size_hint(),
            WriteSink::Plain(body) => body.size_hint(),
        }
    }
}

/// The write slot as seen after the write completed.
#[derive(Debug, Clone, Copy)]
pub enum WrittenSink<'a> {
    /// The installed tee survived; its copy is complete.
    Tee(&'a TeeBuffer),
    /// The slot no longer holds a tee.
    Plain,
}

/// Called once per body write, after the write completed.
pub trait BodyWriteHook {
    /// Inspects the sink that was actually written.
    fn body_written(&self, sink: WrittenSink<'_>);
}

impl<H> BodyWriteHook for std::sync::Arc<H>
where
    H: BodyWriteHook + ?Sized,
{
    fn body_written(&self, sink: WrittenSink<'_>) {
        (**self).body_written(sink)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    Writing,
    Completed,
    Failed,
}

/// Drives a [`WriteSink`] and reports its completion to a hook.
///
/// Completion is detected in three places, whichever comes first:
///
/// - a frame was yielded and the sink now reports end of stream,
/// - the sink yielded end of stream,
/// - the body is dropped while the sink reports end of stream (hosts do not
///   poll bodies that are empty up front).
///
/// A sink error or a drop in the middle of the stream discards the copy and
/// the hook is never called.
#[pin_project(PinnedDrop)]
pub struct ObservedBody<B, H>
where
    B: HttpBody,
    H: BodyWriteHook,
{
    #[pin]
    sink: WriteSink<B>,
    hook: H,
    state: WriteState,
}

impl<B, H> ObservedBody<B, H>
where
    B: HttpBody,
    H: BodyWriteHook,
{
    /// Observes writes of `sink`, reporting to `hook`.
    pub fn new(sink: WriteSink<B>, hook: H) -> Self {
        Self {
            sink,
            hook,
            state: WriteState::Writing,
        }
    }

    /// The observed write slot.
    pub fn sink(&self) -> &WriteSink<B> {
        &self.sink
    }
}

impl<B, H> std::fmt::Debug for ObservedBody<B, H>
where
    B: HttpBody + std::fmt::Debug,
    H: BodyWriteHook,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedBody")
            .field("sink", &self.sink)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn complete<B: HttpBody, H: BodyWriteHook>(state: &mut WriteState, sink: &WriteSink<B>, hook: &H) {
    if *state == WriteState::Writing {
        *state = WriteState::Completed;
        hook.body_written(sink.written());
    }
}

impl<B, H> HttpBody for ObservedBody<B, H>
where
    B: HttpBody,
    H: BodyWriteHook,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let mut this = self.project();
        let polled = match this.sink.as_mut().poll_frame(cx) {
            Poll::Ready(polled) => polled,
            Poll::Pending => return Poll::Pending,
        };

        match &polled {
            Some(Ok(_)) => {
                if this.sink.is_end_stream() {
                    complete(this.state, &*this.sink, this.hook);
                }
            }
            Some(Err(_)) => {
                if *this.state == WriteState::Writing {
                    *this.state = WriteState::Failed;
                }
            }
            None => complete(this.state, &*this.sink, this.hook),
        }

        Poll::Ready(polled)
    }

    fn is_end_stream(&self) -> bool {
        self.sink.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.sink.size_hint()
    }
}

#[pinned_drop]
impl<B, H> PinnedDrop for ObservedBody<B, H>
where
    B: HttpBody,
    H: BodyWriteHook,
{
    fn drop(self: Pin<&mut Self>) {
        let this = self.project();
        if *this.state == WriteState::Writing && this.sink.is_end_stream() {
            complete(this.state, &*this.sink, this.hook);
        }
    }
}
