//! Transport failure types.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

/// What went wrong on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Peer reset or aborted the connection.
    ConnectionReset,
    /// Connection could not be established in time.
    ConnectTimeout,
    /// No data arrived within the read timeout.
    ReadTimeout,
    /// Stream ended before a complete response was read.
    UnexpectedEof,
    /// Connection refused or otherwise not established.
    Connect,
    /// Malformed request or response.
    Protocol,
    Other,
}

impl TransportErrorKind {
    /// Network faults that are expected to clear on their own.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            TransportErrorKind::ConnectionReset
                | TransportErrorKind::ConnectTimeout
                | TransportErrorKind::ReadTimeout
                | TransportErrorKind::UnexpectedEof
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            TransportErrorKind::ConnectionReset => "connection reset",
            TransportErrorKind::ConnectTimeout => "connect timeout",
            TransportErrorKind::ReadTimeout => "read timeout",
            TransportErrorKind::UnexpectedEof => "unexpected end of stream",
            TransportErrorKind::Connect => "connect error",
            TransportErrorKind::Protocol => "protocol error",
            TransportErrorKind::Other => "transport error",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single transport attempt.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    retryable: bool,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
            source: None,
        }
    }

    /// Mark the failure as safe to retry even if its kind is not transient.
    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the transport flagged this failure as retryable.
    pub fn retry_hint(&self) -> bool {
        self.retryable
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_transient() || self.retryable
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => TransportErrorKind::ConnectionReset,
            io::ErrorKind::TimedOut => TransportErrorKind::ReadTimeout,
            io::ErrorKind::UnexpectedEof => TransportErrorKind::UnexpectedEof,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::NotConnected
            | io::ErrorKind::AddrNotAvailable => TransportErrorKind::Connect,
            io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => TransportErrorKind::Protocol,
            _ => TransportErrorKind::Other,
        };
        TransportError::new(kind, err.to_string()).with_source(err)
    }
}
