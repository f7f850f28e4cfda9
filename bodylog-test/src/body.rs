//! Scripted bodies for exercising stream handling.

use std::convert::Infallible;
use std::io;

use bytes::Bytes;
use futures::stream::{self, Iter};
use http_body::Frame;
use http_body_util::StreamBody;

/// Body type produced by [`chunked`].
pub type ChunkedBody = StreamBody<Iter<std::vec::IntoIter<Result<Frame<Bytes>, Infallible>>>>;

/// Body type produced by [`failing_after`].
pub type FailingBody = StreamBody<Iter<std::vec::IntoIter<Result<Frame<Bytes>, io::Error>>>>;

/// A body yielding each chunk as its own data frame.
pub fn chunked<I, C>(chunks: I) -> ChunkedBody
where
    I: IntoIterator<Item = C>,
    C: Into<Bytes>,
{
    let frames: Vec<_> = chunks
        .into_iter()
        .map(|chunk| Ok(Frame::data(chunk.into())))
        .collect();
    StreamBody::new(stream::iter(frames))
}

/// A body yielding the chunks and then a connection-reset error.
pub fn failing_after<I, C>(chunks: I) -> FailingBody
where
    I: IntoIterator<Item = C>,
    C: Into<Bytes>,
{
    let mut frames: Vec<_> = chunks
        .into_iter()
        .map(|chunk| Ok(Frame::data(chunk.into())))
        .collect();
    frames.push(Err(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "connection reset",
    )));
    StreamBody::new(stream::iter(frames))
}
