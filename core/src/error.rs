//! Error types for the comments API client.
//!
//! # Design
//! `ApiError` is the flat taxonomy callers match on. Its `Display` is the
//! message alone. `TransportError` is the cause attached to
//! `ApiError::Transport` and is never returned by the client on its own.

use thiserror::Error;

/// Errors returned by `CommentsClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered 401 with an error message.
    #[error("{message}")]
    Unauthorized { message: String },

    /// The server answered 403 with an error message.
    #[error("{message}")]
    Forbidden { message: String },

    /// The response body failed validation. `message` lists every problem
    /// found, joined by `"; "`.
    #[error("{message}")]
    InvalidPayload { message: String },

    /// Any other failure: unexpected status codes, connection failures,
    /// undecodable bodies.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: TransportError,
    },
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::InvalidPayload { message }
            | ApiError::Transport { message, .. } => message,
        }
    }

    pub(crate) fn invalid_payload(message: impl Into<String>) -> Self {
        ApiError::InvalidPayload {
            message: message.into(),
        }
    }

    pub(crate) fn transport(message: impl Into<String>, source: TransportError) -> Self {
        ApiError::Transport {
            message: message.into(),
            source,
        }
    }

    /// Short variant name, used as a structured log field.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::Forbidden { .. } => "forbidden",
            ApiError::InvalidPayload { .. } => "invalid_payload",
            ApiError::Transport { .. } => "transport",
        }
    }
}

/// Underlying failure carried by `ApiError::Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A response was received but its status was not 2xx.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// No response was obtained (connection refused, timeout, unreadable body).
    #[error("connection failed: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A 2xx response body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("request body could not be serialized: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TransportError {
    pub fn connection(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TransportError::Connection(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_is_the_bare_message() {
        let err = ApiError::Unauthorized {
            message: "token expired".to_string(),
        };
        assert_eq!(err.to_string(), "token expired");
        assert_eq!(err.message(), "token expired");
    }

    #[test]
    fn transport_error_keeps_its_cause() {
        let err = ApiError::transport(
            "unable to perform comments request",
            TransportError::Status {
                status: 400,
                body: "bad".to_string(),
            },
        );
        assert_eq!(err.to_string(), "unable to perform comments request");
        let source = err.source().expect("cause is attached");
        assert_eq!(source.to_string(), "HTTP 400: bad");
    }

    #[test]
    fn connection_error_wraps_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::connection(io);
        assert_eq!(err.to_string(), "connection failed: refused");
        assert!(err.source().is_some());
    }
}
