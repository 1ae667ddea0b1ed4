//! HTTP transport boundary for the fila API client.
//!
//! # Design
//! Requests and responses are plain data with owned fields. The client
//! builds an `HttpRequest` and hands it to an injected [`HttpTransport`]
//! for execution, so the core never touches the network itself. Keeping
//! the transport behind a trait lets hosts substitute request-scoped
//! transports (a per-request fetch in a server-rendering runtime, a
//! scripted double in tests) without changing the client.

use std::fmt;

/// HTTP method for a request. The fila backend only uses these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An HTTP request described as plain data, ready for a transport to
/// execute. Built by the client; never constructed by callers directly.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Non-2xx statuses are data, not transport failures: transports must
/// return them here so the client can map them to structured errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP layer: DNS, connect, TLS, a torn connection.
/// No response was received; the message is the transport's own diagnostic.
#[derive(Debug, Clone)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failed: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Executes an [`HttpRequest`] against the network (or a test double).
///
/// Implementations own timeouts and cancellation; the client enforces
/// neither, so a hung transport hangs the caller.
pub trait HttpTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
