// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for cdnpurge operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing inputs, invalid values)
    ConfigInvalid,

    /// Request cannot be built or signed (invalid type, empty url list, etc.)
    RequestInvalid,

    /// Credentials are missing or malformed
    CredentialInvalid,

    /// The request could not be delivered (connect, tls, reset, ...)
    Transport,

    /// The attempt did not complete within the configured timeout
    Timeout,

    /// The service answered with a 5xx status
    ServerError,

    /// The service answered with a non-success, non-5xx status
    ClientError,

    /// The service accepted the request but rejected it in the response body
    Rejected,

    /// Unexpected errors (decoding, I/O, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without its source chain
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if the failed operation may succeed when sent again.
    ///
    /// Only transport failures, timeouts and 5xx responses are retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Transport | ErrorKind::Timeout | ErrorKind::ServerError
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rejected, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create an error from a non-success http status.
    ///
    /// The message is `"<code> <reason>"`, e.g. `503 Service Unavailable`.
    pub fn from_status(status: http::StatusCode) -> Self {
        let message = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };

        if status.is_server_error() {
            Self::new(ErrorKind::ServerError, message)
        } else {
            Self::new(ErrorKind::ClientError, message)
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Timeout => write!(f, "timed out"),
            ErrorKind::ServerError => write!(f, "server error"),
            ErrorKind::ClientError => write!(f, "client error"),
            ErrorKind::Rejected => write!(f, "rejected by service"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use test_case::test_case;

    #[test_case(StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::ServerError, "500 Internal Server Error"; "500")]
    #[test_case(StatusCode::BAD_GATEWAY, ErrorKind::ServerError, "502 Bad Gateway"; "502")]
    #[test_case(StatusCode::BAD_REQUEST, ErrorKind::ClientError, "400 Bad Request"; "400")]
    #[test_case(StatusCode::UNAUTHORIZED, ErrorKind::ClientError, "401 Unauthorized"; "401")]
    fn test_from_status(status: StatusCode, kind: ErrorKind, message: &str) {
        let err = Error::from_status(status);
        assert_eq!(err.kind(), kind);
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::transport("connection reset").is_retryable());
        assert!(Error::timeout("timed out").is_retryable());
        assert!(Error::from_status(StatusCode::SERVICE_UNAVAILABLE).is_retryable());

        assert!(!Error::from_status(StatusCode::FORBIDDEN).is_retryable());
        assert!(!Error::rejected("bad token").is_retryable());
        assert!(!Error::config_invalid("missing").is_retryable());
        assert!(!Error::unexpected("decode").is_retryable());
    }

    #[test]
    fn test_display_keeps_message_only() {
        let err = Error::transport("dns error").with_source(anyhow::anyhow!("lookup failed"));
        assert_eq!(err.to_string(), "dns error");
        assert_eq!(err.message(), "dns error");
    }
}
