//! Blocking stream over callback-completed socket primitives.
//!
//! Each blocking call issues one primitive, parks the calling thread on the
//! matching [`PendingOperation`](sockbridge_core::pending::PendingOperation)
//! and translates the completion into a return value.
//!
//! State machine:
//!
//! ```text
//! Unopened → Connecting → Open ⇄ (Read | Write) → Closing → Closed
//! ```
//!
//! `Unopened` and `Connecting` live inside [`BridgeStream::open`]; a stream
//! value only exists once connect has completed. `Closed` is terminal: every
//! later call fails with [`BridgeError::StreamClosed`] without reaching the
//! host.
//!
//! # Concurrency
//!
//! The operation slot is a `parking_lot::Mutex` held for the whole
//! issue-and-wait cycle, so at most one primitive is outstanding per socket
//! even when the stream is shared between threads. Calls are served in lock
//! order.
//!
//! # Deadlines
//!
//! Deadline setters are accepted and ignored. A primitive whose completion
//! never fires blocks its caller forever.

use std::fmt;
use std::io;
use std::time::Instant;

use bytes::{Buf, Bytes};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use sockbridge_core::endpoint::Endpoint;
use sockbridge_core::error::{BridgeError, Result};
use sockbridge_core::monitor::StreamEvent;
use sockbridge_core::net_error;
use sockbridge_core::options::{ConnectStatusPolicy, StreamOptions};
use sockbridge_core::pending::completion_pair;
use sockbridge_core::poison::PoisonGuard;
use sockbridge_core::primitives::{ConnectOutcome, ReadOutcome, SocketId, SocketPrimitives};

use crate::addr::PlaceholderAddr;

/// Observable lifecycle state of a [`BridgeStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Connected; reads and writes are accepted.
    Open,
    /// Close was called; the socket handle is no longer valid.
    Closed,
}

/// Result of a single [`BridgeStream::read_chunk`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadResult {
    /// Bytes copied into the caller's buffer
    pub n: usize,
    /// The host signalled end of stream and no buffered bytes remain
    pub end_of_stream: bool,
}

struct Inner {
    state: StreamState,
    poisoned: bool,
    /// End of stream reported by the host
    eof: bool,
    /// Bytes delivered by the host beyond the caller's buffer
    residual: Bytes,
}

/// Blocking byte stream bound to one host socket.
pub struct BridgeStream<P: SocketPrimitives> {
    primitives: P,
    endpoint: Endpoint,
    socket: SocketId,
    options: StreamOptions,
    inner: Mutex<Inner>,
}

impl<P: SocketPrimitives> BridgeStream<P> {
    /// Connect to `host:port` with default options.
    ///
    /// Issues exactly one connect primitive and blocks until it completes.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::InvalidEndpoint`] / [`BridgeError::InvalidPort`] for an
    ///   empty host or port `0` (no primitive is issued)
    /// - [`BridgeError::ConnectFailure`] if the completion reports a non-zero
    ///   status under [`ConnectStatusPolicy::Strict`]
    /// - [`BridgeError::CompletionDropped`] if the host dropped the completion
    pub fn open(primitives: P, host: &str, port: u16) -> Result<Self> {
        Self::open_with_options(primitives, host, port, StreamOptions::default())
    }

    /// Connect to `host:port` with custom options.
    pub fn open_with_options(
        primitives: P,
        host: &str,
        port: u16,
        options: StreamOptions,
    ) -> Result<Self> {
        let endpoint = Endpoint::new(host, port)?;
        Self::open_endpoint(primitives, endpoint, options)
    }

    /// Connect to an already parsed endpoint.
    pub fn open_endpoint(
        primitives: P,
        endpoint: Endpoint,
        options: StreamOptions,
    ) -> Result<Self> {
        debug!(%endpoint, "connect start");
        let (done, pending) = completion_pair::<ConnectOutcome>("connect");
        primitives.connect(endpoint.host(), endpoint.port(), done);
        let outcome = pending.wait()?;
        debug!(
            %endpoint,
            socket = outcome.socket.get(),
            status = outcome.status,
            "connect completed"
        );

        if options.connect_status == ConnectStatusPolicy::Strict
            && !net_error::is_ok(outcome.status)
        {
            let err = BridgeError::connect_failure(endpoint.to_string(), outcome.status);
            warn!(%endpoint, status = outcome.status, "connect failed: {err}");
            emit(
                &options,
                StreamEvent::ConnectFailed {
                    endpoint,
                    reason: net_error::describe(outcome.status).into_owned(),
                },
            );
            return Err(err);
        }

        emit(
            &options,
            StreamEvent::Connected {
                endpoint: endpoint.clone(),
                socket: outcome.socket,
            },
        );

        Ok(Self {
            primitives,
            endpoint,
            socket: outcome.socket,
            options,
            inner: Mutex::new(Inner {
                state: StreamState::Open,
                poisoned: false,
                eof: false,
                residual: Bytes::new(),
            }),
        })
    }

    /// Read into `buf`, reporting end of stream alongside the bytes.
    ///
    /// Issues at most one read primitive requesting up to
    /// `min(buf.len(), max_read_len)` bytes. Bytes that arrive together with
    /// the end-of-stream signal are returned by the same call with
    /// `end_of_stream = true`. If the host delivers more than fits in `buf`,
    /// the surplus is kept and served by the next call without reaching the
    /// host. Once end of stream has been seen and drained, reads return
    /// `(0, true)` without issuing a primitive. An empty `buf` returns
    /// `(0, false)` immediately.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::StreamClosed`] after [`close`](Self::close)
    /// - [`BridgeError::Poisoned`] after a lost completion
    /// - [`BridgeError::CompletionDropped`] if this read's completion is lost
    pub fn read_chunk(&self, buf: &mut [u8]) -> Result<ReadResult> {
        let mut inner = self.inner.lock();
        inner.check_usable(self.socket, "read")?;

        if !inner.residual.is_empty() {
            let n = copy_into(buf, &mut inner.residual);
            return Ok(ReadResult {
                n,
                end_of_stream: inner.eof && inner.residual.is_empty(),
            });
        }
        if inner.eof {
            return Ok(ReadResult {
                n: 0,
                end_of_stream: true,
            });
        }
        if buf.is_empty() {
            return Ok(ReadResult {
                n: 0,
                end_of_stream: false,
            });
        }

        let max_len = buf.len().min(self.options.max_read_len);
        debug!(socket = self.socket.get(), max_len, "read start");
        let (done, pending) = completion_pair::<ReadOutcome>("read");

        let guard = PoisonGuard::new(&mut inner.poisoned);
        self.primitives.read(self.socket, max_len, done);
        let outcome = pending.wait().map_err(|e| self.lost("read", e))?;
        guard.disarm();

        let mut payload = outcome.payload;
        let n = copy_into(buf, &mut payload);
        inner.residual = payload;
        debug!(
            socket = self.socket.get(),
            bytes = n,
            end_of_stream = outcome.end_of_stream,
            "read completed"
        );

        if outcome.end_of_stream {
            inner.eof = true;
            emit(
                &self.options,
                StreamEvent::EndOfStream {
                    socket: self.socket,
                },
            );
        }

        Ok(ReadResult {
            n,
            end_of_stream: inner.eof && inner.residual.is_empty(),
        })
    }

    /// Write all of `data`.
    ///
    /// Issues one write primitive carrying a copy of `data`; the host either
    /// writes it in full or fails. Returns `data.len()`. An empty `data`
    /// returns `0` without reaching the host.
    ///
    /// # Errors
    ///
    /// Same as [`read_chunk`](Self::read_chunk).
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        inner.check_usable(self.socket, "write")?;

        if data.is_empty() {
            return Ok(0);
        }

        debug!(socket = self.socket.get(), bytes = data.len(), "write start");
        let (done, pending) = completion_pair::<()>("write");

        let guard = PoisonGuard::new(&mut inner.poisoned);
        self.primitives
            .write(self.socket, Bytes::copy_from_slice(data), done);
        pending.wait().map_err(|e| self.lost("write", e))?;
        guard.disarm();

        debug!(socket = self.socket.get(), "write completed");
        Ok(data.len())
    }

    /// Disconnect and invalidate the socket handle.
    ///
    /// Issues one disconnect primitive and blocks until it is acknowledged.
    /// The stream is closed on return whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::StreamClosed`] if already closed (no primitive issued)
    /// - [`BridgeError::CompletionDropped`] if the acknowledgement was lost
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state == StreamState::Closed {
            warn!(socket = self.socket.get(), "close on closed stream");
            return Err(BridgeError::StreamClosed);
        }
        inner.state = StreamState::Closed;
        inner.residual = Bytes::new();
        self.disconnect()
    }

    fn disconnect(&self) -> Result<()> {
        debug!(socket = self.socket.get(), "disconnect start");
        let (done, pending) = completion_pair::<()>("disconnect");
        self.primitives.disconnect(self.socket, done);
        let result = pending.wait().map_err(|e| self.lost("disconnect", e));
        emit(
            &self.options,
            StreamEvent::Closed {
                socket: self.socket,
            },
        );
        debug!(socket = self.socket.get(), ok = result.is_ok(), "disconnect completed");
        result
    }

    fn lost(&self, op: &'static str, err: BridgeError) -> BridgeError {
        warn!(socket = self.socket.get(), op, "completion dropped by host");
        err
    }

    /// Accepted for interface compatibility; has no effect.
    pub fn set_deadline(&self, deadline: Option<Instant>) -> Result<()> {
        trace!(socket = self.socket.get(), ?deadline, "set deadline ignored");
        Ok(())
    }

    /// Accepted for interface compatibility; has no effect.
    pub fn set_read_deadline(&self, deadline: Option<Instant>) -> Result<()> {
        trace!(socket = self.socket.get(), ?deadline, "set read deadline ignored");
        Ok(())
    }

    /// Accepted for interface compatibility; has no effect.
    pub fn set_write_deadline(&self, deadline: Option<Instant>) -> Result<()> {
        trace!(socket = self.socket.get(), ?deadline, "set write deadline ignored");
        Ok(())
    }

    /// Local address placeholder; the host does not expose addressing.
    pub fn local_addr(&self) -> PlaceholderAddr {
        trace!(socket = self.socket.get(), "local addr");
        PlaceholderAddr
    }

    /// Remote address placeholder; see [`endpoint`](Self::endpoint) for what
    /// was dialed.
    pub fn remote_addr(&self) -> PlaceholderAddr {
        trace!(socket = self.socket.get(), "remote addr");
        PlaceholderAddr
    }

    /// Host handle of this stream.
    pub const fn socket(&self) -> SocketId {
        self.socket
    }

    /// Endpoint passed to connect.
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Current state. Waits for an in-flight operation to finish.
    pub fn state(&self) -> StreamState {
        self.inner.lock().state
    }

    /// Whether a lost completion has made the stream unusable.
    pub fn is_poisoned(&self) -> bool {
        self.inner.lock().poisoned
    }
}

impl Inner {
    fn check_usable(&self, socket: SocketId, op: &'static str) -> Result<()> {
        if self.state == StreamState::Closed {
            warn!(socket = socket.get(), op, "operation on closed stream");
            return Err(BridgeError::StreamClosed);
        }
        if self.poisoned {
            return Err(BridgeError::Poisoned);
        }
        Ok(())
    }
}

fn copy_into(dst: &mut [u8], src: &mut Bytes) -> usize {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
    src.advance(n);
    n
}

fn emit(options: &StreamOptions, event: StreamEvent) {
    if let Some(tx) = &options.monitor {
        let _ = tx.send(event);
    }
}

impl<P: SocketPrimitives> Drop for BridgeStream<P> {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        if inner.state == StreamState::Open {
            inner.state = StreamState::Closed;
            let _ = self.disconnect();
        }
    }
}

impl<P: SocketPrimitives> fmt::Debug for BridgeStream<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeStream")
            .field("endpoint", &self.endpoint)
            .field("socket", &self.socket)
            .finish_non_exhaustive()
    }
}

impl<P: SocketPrimitives> io::Read for &BridgeStream<P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let result = self.read_chunk(buf)?;
            // An empty batch without end of stream is not EOF; ask again.
            if result.n > 0 || result.end_of_stream || buf.is_empty() {
                return Ok(result.n);
            }
        }
    }
}

impl<P: SocketPrimitives> io::Write for &BridgeStream<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(BridgeStream::write(*self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<P: SocketPrimitives> io::Read for BridgeStream<P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut &*self, buf)
    }
}

impl<P: SocketPrimitives> io::Write for BridgeStream<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
