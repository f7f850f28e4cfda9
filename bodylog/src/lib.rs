//! # bodylog
//!
//! Request and response body logging for HTTP servers and clients.
//!
//! HTTP bodies are one-shot streams: whoever reads them consumes them. To log
//! a body and still deliver it, this crate uses two techniques depending on
//! who reads the stream.
//!
//! | Stream | Read/written by | Technique |
//! |--------|-----------------|-----------|
//! | server request | the interceptor, before the handler | [capture](capture) and replace |
//! | server response | the host, after the interceptor returned | [tee](tee) in the write path |
//! | client request | the client, after the interceptor returned | [tee](tee) in the write path |
//! | client response | the interceptor, before the caller | [capture](capture) and replace |
//!
//! The [`InboundInterceptor`] and [`OutboundInterceptor`] implement the hook
//! points a host framework calls. Host adapters live in separate crates:
//! `bodylog-tower` for servers and `bodylog-reqwest` for clients.
//!
//! ## Write completion
//!
//! A tee is inspected only once the host finished writing the body. The
//! [`ObservedBody`] wrapper detects completion and passes the write slot
//! ([`WriteSink`]) to a [`BodyWriteHook`]. If something replaced the tee in
//! the meantime, the interceptor logs a `MISSED` line instead of failing.
//!
//! ## Logging
//!
//! Every line is emitted at INFO through `tracing` by a [`BodyLogger`]
//! handle, built once from [`BodyLogConfig`] and passed to each interceptor.

pub mod capture;
pub mod config;
pub mod context;
pub mod error;
pub mod inbound;
pub mod logger;
pub mod outbound;
pub mod sink;
pub mod tee;

pub use capture::{CapturedBody, capture_body, capture_request, capture_response};
pub use config::{BodyLogConfig, DEFAULT_COMPONENT, DEFAULT_EMPTY_BODY};
pub use context::{ClientRequestContext, ExchangeContext, ServerResponseContext};
pub use error::{BoxError, CaptureError, ConfigError};
pub use inbound::InboundInterceptor;
pub use logger::BodyLogger;
pub use outbound::OutboundInterceptor;
pub use sink::{BodyWriteHook, ObservedBody, WriteSink, WrittenSink};
pub use tee::{TeeBody, TeeBuffer, TeeWriter};
