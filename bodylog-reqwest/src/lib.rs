//! Bodylog integration for the reqwest HTTP client.
//!
//! [`OutboundLogMiddleware`] plugs into a `reqwest_middleware::ClientWithMiddleware`
//! and emits two lines per call:
//!
//! ```text
//! External HTTP(s) request: POST http://localhost:5008/send. Body: {"a":"eugene"}
//! External HTTP(s) response from http://localhost:5008/send: 200, body: hello
//! ```
//!
//! A request sent without a body is logged immediately with the empty-body
//! marker. Failing to read the response body fails the call with
//! `reqwest_middleware::Error::Middleware`.

mod middleware;

pub use middleware::{OutboundLogMiddleware, OutboundLogMiddlewareBuilder};
