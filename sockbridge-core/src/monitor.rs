//! Stream event monitoring.
//!
//! Provides event channels for tracking bridge stream lifecycle events like
//! connections, end of stream, and close.

use crate::endpoint::Endpoint;
use crate::primitives::SocketId;
use std::fmt;

/// Stream lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Connect completed and the stream is open.
    Connected { endpoint: Endpoint, socket: SocketId },

    /// Connect completed without a usable socket.
    ConnectFailed { endpoint: Endpoint, reason: String },

    /// The host signalled end of stream on a read.
    EndOfStream { socket: SocketId },

    /// Disconnect was acknowledged (or the stream gave up on it).
    Closed { socket: SocketId },
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { endpoint, socket } => {
                write!(f, "Connected to {endpoint} as {socket}")
            }
            Self::ConnectFailed { endpoint, reason } => {
                write!(f, "Connect failed for {endpoint}: {reason}")
            }
            Self::EndOfStream { socket } => write!(f, "End of stream on {socket}"),
            Self::Closed { socket } => write!(f, "Closed {socket}"),
        }
    }
}

/// Handle for receiving stream events.
pub type StreamMonitor = flume::Receiver<StreamEvent>;

/// Sender for stream events, installed through the stream options.
pub type StreamEventSender = flume::Sender<StreamEvent>;

/// Creates a new monitoring channel pair.
#[must_use]
pub fn create_monitor() -> (StreamEventSender, StreamMonitor) {
    flume::unbounded()
}
