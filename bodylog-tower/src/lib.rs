//! Tower middleware integration for bodylog.
//!
//! This crate provides [`InboundLog`], a Tower [`Layer`] that logs the body
//! of every request a server receives and every response it writes.
//!
//! # How it works
//!
//! - The request body is read to completion, logged, and replaced by an
//!   in-memory copy before the wrapped service runs.
//! - The response body gets a tee in its write slot. The outgoing line is
//!   logged once the server has finished writing the body, not when the
//!   wrapped service returns.
//!
//! ```text
//! Incoming HTTP(s) request: POST /orders. Body: {"a":"eugene"}
//! Outgoing HTTP(s) request: 200. Body: hello
//! ```
//!
//! # Errors
//!
//! The service error type is [`tower::BoxError`]: a request body that fails
//! to read, or an error from the wrapped service, is returned unmodified.
//! Axum applications turn it into a response with
//! `axum::error_handling::HandleErrorLayer`.
//!
//! # Quick Start
//!
//! ```ignore
//! use bodylog::BodyLogConfig;
//! use bodylog_tower::InboundLog;
//! use tower::{ServiceBuilder, service_fn};
//!
//! let layer = InboundLog::builder()
//!     .config(BodyLogConfig::from_yaml("component: orders-api")?)
//!     .build();
//!
//! let service = ServiceBuilder::new()
//!     .layer(layer)
//!     .service(service_fn(|_req| async {
//!         Ok::<_, std::convert::Infallible>(http::Response::new("hello".to_string()))
//!     }));
//! ```
//!
//! [`Layer`]: tower::Layer

/// Tower layer and builder.
pub mod layer;
/// The Tower service that performs logging.
pub mod service;

pub use layer::{InboundLog, InboundLogBuilder};
pub use service::{InboundLogService, LoggedBody};
