//! Correlation handles carried by a tee for the duration of one body write.
//!
//! A tee is installed before the host framework writes a body and inspected
//! only after the write completes. By then the interceptor has long returned
//! control, so the tee itself carries whatever the final log line needs.
//! The set of exchanges is closed: a tee either duplicates a server response
//! or an outgoing client request.

use http::{Method, StatusCode};

/// The exchange a tee belongs to, decided when the tee is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeContext {
    /// A response written by the server back to its caller.
    ServerResponse(ServerResponseContext),
    /// A request body sent by the client to a downstream system.
    ClientRequest(ClientRequestContext),
}

impl ExchangeContext {
    /// Context for a server response with the given status.
    pub fn server_response(status: StatusCode) -> Self {
        ExchangeContext::ServerResponse(ServerResponseContext { status })
    }

    /// Context for an outgoing client request.
    pub fn client_request(method: Method, uri: impl Into<String>) -> Self {
        ExchangeContext::ClientRequest(ClientRequestContext {
            method,
            uri: uri.into(),
        })
    }

    /// Returns the server response context, if this is one.
    pub fn as_server_response(&self) -> Option<&ServerResponseContext> {
        match self {
            ExchangeContext::ServerResponse(ctx) => Some(ctx),
            ExchangeContext::ClientRequest(_) => None,
        }
    }

    /// Returns the client request context, if this is one.
    pub fn as_client_request(&self) -> Option<&ClientRequestContext> {
        match self {
            ExchangeContext::ClientRequest(ctx) => Some(ctx),
            ExchangeContext::ServerResponse(_) => None,
        }
    }
}

/// What the outgoing response log line needs from a server exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerResponseContext {
    status: StatusCode,
}

impl ServerResponseContext {
    /// Status code of the response being written.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// What the external request log line needs from a client exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRequestContext {
    method: Method,
    uri: String,
}

impl ClientRequestContext {
    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute request URI in its ASCII form.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}
