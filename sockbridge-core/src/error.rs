/// Sockbridge Error Types
///
/// Every failure the adapter can observe is surfaced directly to the caller;
/// nothing here is retried.

use std::io;
use thiserror::Error;

/// Main error type for bridge stream operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Connect completion did not yield a usable socket
    #[error("Connect to {endpoint} failed: {reason} (status {status})")]
    ConnectFailure {
        endpoint: String,
        status: i32,
        reason: String,
    },

    /// Operation attempted on an unopened or closed stream
    #[error("Stream closed")]
    StreamClosed,

    /// The host dropped a completion without firing it
    #[error("Completion for {op} dropped without firing")]
    CompletionDropped { op: &'static str },

    /// A previous completion was lost; the host socket state is unknown
    #[error("Stream poisoned by a lost completion")]
    Poisoned,

    /// Address could not be split into host and port
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Port missing, non-numeric, or out of range
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for bridge stream operations
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Create a connect failure for the given endpoint and host status
    pub fn connect_failure(endpoint: impl Into<String>, status: i32) -> Self {
        Self::ConnectFailure {
            endpoint: endpoint.into(),
            status,
            reason: crate::net_error::describe(status).into_owned(),
        }
    }

    /// Create an invalid endpoint error with a message
    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::InvalidEndpoint(msg.into())
    }

    /// Create an invalid port error with a message
    pub fn invalid_port(msg: impl Into<String>) -> Self {
        Self::InvalidPort(msg.into())
    }

    /// Check if this error is recoverable
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Check if this is a connection error
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailure { .. }
                | Self::StreamClosed
                | Self::CompletionDropped { .. }
                | Self::Poisoned
        )
    }
}

impl From<BridgeError> for io::Error {
    fn from(err: BridgeError) -> Self {
        let kind = match &err {
            BridgeError::Io(e) => e.kind(),
            BridgeError::StreamClosed => io::ErrorKind::NotConnected,
            BridgeError::ConnectFailure { .. } => io::ErrorKind::ConnectionRefused,
            BridgeError::CompletionDropped { .. } | BridgeError::Poisoned => {
                io::ErrorKind::BrokenPipe
            }
            BridgeError::InvalidEndpoint(_) | BridgeError::InvalidPort(_) => {
                io::ErrorKind::InvalidInput
            }
        };
        match err {
            BridgeError::Io(e) => e,
            other => io::Error::new(kind, other),
        }
    }
}
