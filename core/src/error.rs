//! Error types for the GraphQL transport.
//!
//! # Design
//! `ClientError` is the only error a completion callback ever sees. Its three
//! variants are transparent: transport failures and decode failures reach the
//! caller unchanged, and `ResponseError` carries the fixed diagnostic message
//! built from the response status and raw body.

use std::fmt;

use thiserror::Error;

use crate::http::{charset_param, decode_text, find_header, HttpResponse};

/// Result alias used throughout the crate.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors delivered to a completion callback.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No HTTP response was obtained (connection reset, DNS failure, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An HTTP response was received but could not be used.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The body was a JSON object but the operation could not decode it.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// An opaque error reported by a dispatcher before any HTTP response arrived.
pub struct TransportError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl TransportError {
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(error.into())
    }

    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.0
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Debug for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Failure of an operation-specific decoder.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode GraphQL response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Why a received HTTP response was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseErrorKind {
    /// The status code was outside 200..=299.
    ErrorResponse,
    /// The status was successful but the body was missing or not a JSON object.
    InvalidResponse,
}

impl ResponseErrorKind {
    pub const fn label(&self) -> &'static str {
        match self {
            ResponseErrorKind::ErrorResponse => "Received error response",
            ResponseErrorKind::InvalidResponse => "Received invalid response",
        }
    }
}

impl fmt::Display for ResponseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A received HTTP response that could not be turned into a GraphQL result.
///
/// Keeps the status, headers, and raw body bytes for diagnostics. Fields are
/// private; the value never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    kind: ResponseErrorKind,
    status: u16,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl ResponseError {
    pub fn new(kind: ResponseErrorKind, response: HttpResponse) -> Self {
        Self {
            kind,
            status: response.status,
            headers: response.headers,
            body: response.body,
        }
    }

    pub fn kind(&self) -> ResponseErrorKind {
        self.kind
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Canonical reason phrase for the status code, `"Unknown"` if it has none.
    pub fn reason_phrase(&self) -> &'static str {
        ::http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown")
    }

    /// The body as text in the response's declared charset (UTF-8 otherwise).
    pub fn body_description(&self) -> String {
        let Some(body) = self.body.as_deref() else {
            return "Empty response body".to_string();
        };
        let charset = find_header(&self.headers, "content-type").and_then(charset_param);
        decode_text(body, charset.as_deref()).unwrap_or_else(|| "Unreadable response body".to_string())
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}): {}",
            self.kind.label(),
            self.status,
            self.reason_phrase(),
            self.body_description()
        )
    }
}

impl std::error::Error for ResponseError {}
