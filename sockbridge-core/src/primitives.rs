//! Callback-completed socket primitives supplied by a host.
//!
//! A host (a browser runtime, an embedding VM, an RPC shim) exposes four
//! operations that start work and report the result later through a
//! completion. The adapter receives an implementation of
//! [`SocketPrimitives`] by constructor injection; nothing is looked up from
//! global state.
//!
//! Host contract:
//! - each call fires its completion exactly once, from any thread, possibly
//!   before the call returns
//! - the adapter never has more than one call in flight per [`SocketId`]

use std::fmt;

use bytes::Bytes;

use crate::pending::Completion;

/// Opaque handle assigned by the host at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(pub u32);

impl SocketId {
    /// Raw handle value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for SocketId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Result of a connect primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOutcome {
    /// Handle assigned by the host
    pub socket: SocketId,
    /// Host status code, `0` on success (see [`crate::net_error`])
    pub status: i32,
}

impl ConnectOutcome {
    /// Successful connect with the given handle.
    pub const fn ok(socket: SocketId) -> Self {
        Self { socket, status: 0 }
    }

    /// Failed connect; hosts report handle `0` alongside the failure status.
    pub const fn failed(status: i32) -> Self {
        Self {
            socket: SocketId(0),
            status,
        }
    }
}

/// Result of a read primitive.
///
/// A payload can accompany `end_of_stream = true`; those bytes are still data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadOutcome {
    pub payload: Bytes,
    pub end_of_stream: bool,
}

impl ReadOutcome {
    /// Data with more to follow.
    pub fn data(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            end_of_stream: false,
        }
    }

    /// Final batch: the payload (possibly empty) followed by end of stream.
    pub fn last(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            end_of_stream: true,
        }
    }
}

/// Callback-completed socket operations provided by the host.
pub trait SocketPrimitives: Send + Sync {
    /// Start connecting to `host:port`.
    fn connect(&self, host: &str, port: u16, done: Completion<ConnectOutcome>);

    /// Start reading up to `max_len` bytes.
    fn read(&self, socket: SocketId, max_len: usize, done: Completion<ReadOutcome>);

    /// Start writing `data` in full.
    fn write(&self, socket: SocketId, data: Bytes, done: Completion<()>);

    /// Start tearing the connection down.
    fn disconnect(&self, socket: SocketId, done: Completion<()>);
}

impl<P: SocketPrimitives + ?Sized> SocketPrimitives for &P {
    fn connect(&self, host: &str, port: u16, done: Completion<ConnectOutcome>) {
        (**self).connect(host, port, done);
    }

    fn read(&self, socket: SocketId, max_len: usize, done: Completion<ReadOutcome>) {
        (**self).read(socket, max_len, done);
    }

    fn write(&self, socket: SocketId, data: Bytes, done: Completion<()>) {
        (**self).write(socket, data, done);
    }

    fn disconnect(&self, socket: SocketId, done: Completion<()>) {
        (**self).disconnect(socket, done);
    }
}

impl<P: SocketPrimitives + ?Sized> SocketPrimitives for std::sync::Arc<P> {
    fn connect(&self, host: &str, port: u16, done: Completion<ConnectOutcome>) {
        (**self).connect(host, port, done);
    }

    fn read(&self, socket: SocketId, max_len: usize, done: Completion<ReadOutcome>) {
        (**self).read(socket, max_len, done);
    }

    fn write(&self, socket: SocketId, data: Bytes, done: Completion<()>) {
        (**self).write(socket, data, done);
    }

    fn disconnect(&self, socket: SocketId, done: Completion<()>) {
        (**self).disconnect(socket, done);
    }
}
