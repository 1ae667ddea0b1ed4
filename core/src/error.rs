//! Error types for the fila API client.
//!
//! # Design
//! The backend attaches a `{message, errors?}` envelope to every non-2xx
//! response, so `Status` carries the decoded envelope next to the raw
//! status code and callers branch on the code (401 expired session, 422
//! field validation). Transport, serialization and deserialization
//! failures get their own variants so callers can tell "the backend said
//! no" apart from "the call never happened".

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::TransportError;

/// Error envelope returned by the backend on any non-2xx response.
/// `errors` maps field names to validation messages and is only present
/// on validation failures (422 by convention).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, String>>,
}

impl ErrorBody {
    /// Synthetic envelope for responses whose body is not valid JSON.
    /// Falls back to the canonical reason phrase for the status.
    pub fn from_status(status: u16) -> Self {
        Self {
            message: reason(status),
            errors: None,
        }
    }
}

/// Canonical reason phrase for the statuses the backend emits.
fn reason(status: u16) -> String {
    let phrase = match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Request Entity Too Large",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        other => return format!("HTTP {other}"),
    };
    phrase.to_string()
}

/// Errors returned by `FilaClient` calls.
#[derive(Debug)]
pub enum ApiError {
    /// The HTTP round-trip itself failed; no response was received.
    Transport(TransportError),

    /// The backend answered with a non-2xx status and the decoded
    /// (or synthesized) error envelope.
    Status { status: u16, body: ErrorBody },

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl ApiError {
    /// The HTTP status code, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Per-field validation messages, when the backend attached them
    /// (422 responses).
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ApiError::Status { body, .. } => body.errors.as_ref(),
            _ => None,
        }
    }

    /// The session token is missing, invalid or expired (401). Hosts use
    /// this branch to discard stored credentials.
    pub fn is_unauthenticated(&self) -> bool {
        self.status() == Some(401)
    }

    /// The requested resource does not exist (404).
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "{err}"),
            ApiError::Status { status, body } => {
                write!(f, "HTTP {status}: {}", body.message)
            }
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err)
    }
}
