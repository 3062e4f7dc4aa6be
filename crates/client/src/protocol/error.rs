use std::io;
use thiserror::Error;

/// The single error type surfaced by the client.
///
/// Every failure crossing the client boundary is one of these variants. The
/// variant classifies the failure, the message carries the detail (which
/// request, which transport, which header).
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("no transport could handle {request}")]
    NoTransport { request: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("timed out while waiting for {request}")]
    Timeout { request: String },

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("decoding error: {reason}")]
    Decoding { reason: String },

    #[error("response handler error: {reason}")]
    Handler { reason: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl HttpClientError {
    pub fn no_transport<S: ToString>(request: S) -> Self {
        Self::NoTransport { request: request.to_string() }
    }

    pub fn transport<S: ToString>(str: S) -> Self {
        Self::Transport { reason: str.to_string() }
    }

    pub fn timeout<S: ToString>(request: S) -> Self {
        Self::Timeout { request: request.to_string() }
    }

    pub fn malformed<S: ToString>(str: S) -> Self {
        Self::MalformedResponse { reason: str.to_string() }
    }

    pub fn decoding<S: ToString>(str: S) -> Self {
        Self::Decoding { reason: str.to_string() }
    }

    pub fn handler<S: ToString>(str: S) -> Self {
        Self::Handler { reason: str.to_string() }
    }

    pub fn invalid_request<S: ToString>(str: S) -> Self {
        Self::InvalidRequest { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
