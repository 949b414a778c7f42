//! Error types for the M2X API client.
//!
//! # Design
//! Every failure a resource method can hit is folded into one `ApiError`
//! carrying a message, the HTTP status code (0 when no response was
//! received) and the underlying cause as an `ErrorKind`. Callers that only
//! care about "what did the API say" read `message()`/`status_code()`;
//! callers that need to tell a dropped connection from a bad payload match
//! on `kind()`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpResponse;

/// A request could not be sent or its response could not be read.
#[derive(Debug, Clone, Error)]
#[error("{description}")]
pub struct TransportError {
    description: String,
    status: u16,
}

impl TransportError {
    /// A failure before any status line was received.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: 0,
        }
    }

    /// A failure after the server already answered with `status`, e.g. while
    /// reading the body.
    pub fn with_status(description: impl Into<String>, status: u16) -> Self {
        Self {
            description: description.into(),
            status,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::with_status(err.to_string(), status),
            other => Self::new(other.to_string()),
        }
    }
}

/// The underlying cause of an `ApiError`.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Connection or I/O failure; no usable response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be encoded to JSON. Nothing was sent.
    #[error("request encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The status code signalled success but the body had the wrong shape.
    #[error("response decoding failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The API answered with an unexpected status code.
    #[error("{0}")]
    Api(String),
}

/// Errors returned by every `M2xClient` resource method.
#[derive(Debug)]
pub struct ApiError {
    message: String,
    status_code: u16,
    field_errors: BTreeMap<String, Vec<String>>,
    kind: ErrorKind,
}

/// Error body the API sends with non-success responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl ApiError {
    /// Build an error from a transport failure.
    pub fn from_transport(err: TransportError) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status(),
            field_errors: BTreeMap::new(),
            kind: ErrorKind::Transport(err),
        }
    }

    /// Build an error from a non-success response.
    ///
    /// The body is read as `{"message": ..., "errors": ...}`. A missing or
    /// `null` message, or a body that is not such an object, leaves the
    /// message empty; the status code is always reported.
    pub fn from_response(response: &HttpResponse) -> Self {
        let (message, field_errors) = match serde_json::from_slice::<ErrorBody>(&response.body) {
            Ok(body) => (
                body.message.unwrap_or_default(),
                body.errors.map(field_errors).unwrap_or_default(),
            ),
            Err(_) => (String::new(), BTreeMap::new()),
        };
        Self {
            kind: ErrorKind::Api(message.clone()),
            message,
            status_code: response.status,
            field_errors,
        }
    }

    /// Build an error for a request payload that failed to encode.
    pub fn encode(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: 0,
            field_errors: BTreeMap::new(),
            kind: ErrorKind::Encode(err),
        }
    }

    /// Build an error for a success response whose body failed to decode.
    pub fn decode(err: serde_json::Error, status_code: u16) -> Self {
        Self {
            message: err.to_string(),
            status_code,
            field_errors: BTreeMap::new(),
            kind: ErrorKind::Decode(err),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code of the response, or 0 if none was received.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Per-field validation messages, e.g. `name -> ["can't be blank"]`.
    pub fn field_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.field_errors
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::Api(_)) && self.status_code == 404
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status_code, self.message.is_empty()) {
            (0, _) => write!(f, "{}", self.message),
            (status, true) => write!(f, "HTTP {status}"),
            (status, false) => write!(f, "HTTP {status}: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Keep only `field -> [string, ...]` entries; the API is not consistent
/// about this object so anything else is skipped.
fn field_errors(errors: serde_json::Value) -> BTreeMap<String, Vec<String>> {
    let serde_json::Value::Object(map) = errors else {
        return BTreeMap::new();
    };
    map.into_iter()
        .filter_map(|(field, messages)| {
            let messages = match messages {
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                serde_json::Value::String(message) => vec![message],
                _ => return None,
            };
            Some((field, messages))
        })
        .collect()
}
