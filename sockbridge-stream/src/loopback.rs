//! In-memory socket host for tests and demos.
//!
//! [`LoopbackHost`] implements [`SocketPrimitives`] without a network: every
//! connect allocates a socket whose writes are echoed back to its reads.
//! Completions are always fired from a dispatcher thread, never from the
//! caller's thread, the same way a real host delivers them.
//!
//! # Features
//!
//! - **Per-instance state**: sockets live in a `DashMap` owned by the host;
//!   there is no process-wide registry
//! - **Parked reads**: a read on an empty socket waits until data arrives or
//!   the peer finishes sending ([`LoopbackHost::shutdown_write`])
//! - **Invariant checking**: a second primitive on a socket whose previous
//!   one has not completed is counted in [`LoopbackHost::violations`]
//! - **Fault injection**: refused connects and severed sockets whose
//!   completions are dropped
//!
//! # Usage
//!
//! ```rust
//! use std::io::{Read, Write};
//! use sockbridge_stream::{BridgeStream, LoopbackHost};
//!
//! let host = LoopbackHost::new();
//! let mut stream = BridgeStream::open(&host, "127.0.0.1", 9000).unwrap();
//! stream.write_all(b"ping").unwrap();
//! host.shutdown_write(stream.socket());
//!
//! let mut echoed = Vec::new();
//! stream.read_to_end(&mut echoed).unwrap();
//! assert_eq!(echoed, b"ping");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use flume::Sender;
use parking_lot::Mutex;
use tracing::{trace, warn};

use sockbridge_core::pending::Completion;
use sockbridge_core::primitives::{ConnectOutcome, ReadOutcome, SocketId, SocketPrimitives};

/// Snapshot of primitive invocation counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    pub connect: usize,
    pub read: usize,
    pub write: usize,
    pub disconnect: usize,
}

#[derive(Default)]
struct Counters {
    connect: AtomicUsize,
    read: AtomicUsize,
    write: AtomicUsize,
    disconnect: AtomicUsize,
}

#[derive(Default)]
struct Slot {
    buffer: BytesMut,
    /// Peer finished sending; reads drain the buffer then see end of stream
    write_shut: bool,
    parked: Option<(usize, Completion<ReadOutcome>)>,
}

enum Job {
    Connect {
        done: Completion<ConnectOutcome>,
    },
    Read {
        socket: SocketId,
        max_len: usize,
        done: Completion<ReadOutcome>,
    },
    Write {
        socket: SocketId,
        data: Bytes,
        done: Completion<()>,
    },
    Disconnect {
        socket: SocketId,
        done: Completion<()>,
    },
    ShutdownWrite {
        socket: SocketId,
    },
    Sever {
        socket: SocketId,
    },
}

struct Shared {
    sockets: DashMap<SocketId, Slot>,
    in_flight: DashMap<SocketId, usize>,
    next_id: AtomicU32,
    violations: AtomicUsize,
    counters: Counters,
    refuse_status: Mutex<Option<i32>>,
}

/// Echoing in-memory implementation of the host socket primitives.
pub struct LoopbackHost {
    shared: Arc<Shared>,
    jobs: Option<Sender<Job>>,
    dispatcher: Option<JoinHandle<()>>,
}

impl LoopbackHost {
    /// Start a host with its dispatcher thread.
    #[must_use]
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            sockets: DashMap::new(),
            in_flight: DashMap::new(),
            next_id: AtomicU32::new(1),
            violations: AtomicUsize::new(0),
            counters: Counters::default(),
            refuse_status: Mutex::new(None),
        });

        let (tx, rx) = flume::unbounded::<Job>();
        let worker = Arc::clone(&shared);
        let dispatcher = std::thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                worker.run(job);
            }
            trace!("loopback dispatcher stopped");
        });

        Self {
            shared,
            jobs: Some(tx),
            dispatcher: Some(dispatcher),
        }
    }

    /// Make subsequent connects complete with `status` and handle `0`.
    pub fn refuse_connections(&self, status: i32) {
        *self.shared.refuse_status.lock() = Some(status);
    }

    /// Undo [`refuse_connections`](Self::refuse_connections).
    pub fn accept_connections(&self) {
        *self.shared.refuse_status.lock() = None;
    }

    /// The peer stops sending: once buffered bytes are drained, reads on
    /// `socket` complete with end of stream. Later writes are discarded.
    pub fn shutdown_write(&self, socket: SocketId) {
        self.submit(Job::ShutdownWrite { socket });
    }

    /// Forget `socket`: its parked read and every later primitive on it have
    /// their completions dropped without firing.
    pub fn sever(&self, socket: SocketId) {
        self.submit(Job::Sever { socket });
    }

    /// Primitive invocation counts so far.
    pub fn calls(&self) -> CallCounts {
        let c = &self.shared.counters;
        CallCounts {
            connect: c.connect.load(Ordering::SeqCst),
            read: c.read.load(Ordering::SeqCst),
            write: c.write.load(Ordering::SeqCst),
            disconnect: c.disconnect.load(Ordering::SeqCst),
        }
    }

    /// Primitives issued while another was outstanding on the same socket.
    pub fn violations(&self) -> usize {
        self.shared.violations.load(Ordering::SeqCst)
    }

    /// Number of connected sockets.
    pub fn open_sockets(&self) -> usize {
        self.shared.sockets.len()
    }

    /// Bytes written to `socket` and not yet read back.
    pub fn buffered(&self, socket: SocketId) -> usize {
        self.shared
            .sockets
            .get(&socket)
            .map_or(0, |slot| slot.buffer.len())
    }

    fn submit(&self, job: Job) {
        if let Some(jobs) = &self.jobs {
            // Dispatcher gone: the job (and its completion) is dropped.
            let _ = jobs.send(job);
        }
    }

    fn begin(&self, socket: SocketId, op: &'static str) {
        let mut outstanding = self.shared.in_flight.entry(socket).or_insert(0);
        if *outstanding > 0 {
            self.shared.violations.fetch_add(1, Ordering::SeqCst);
            warn!(socket = socket.get(), op, "primitive issued while another is outstanding");
        }
        *outstanding += 1;
    }
}

impl Default for LoopbackHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketPrimitives for LoopbackHost {
    fn connect(&self, host: &str, port: u16, done: Completion<ConnectOutcome>) {
        trace!(host, port, "loopback connect");
        self.shared.counters.connect.fetch_add(1, Ordering::SeqCst);
        self.submit(Job::Connect { done });
    }

    fn read(&self, socket: SocketId, max_len: usize, done: Completion<ReadOutcome>) {
        self.shared.counters.read.fetch_add(1, Ordering::SeqCst);
        self.begin(socket, "read");
        self.submit(Job::Read {
            socket,
            max_len,
            done,
        });
    }

    fn write(&self, socket: SocketId, data: Bytes, done: Completion<()>) {
        self.shared.counters.write.fetch_add(1, Ordering::SeqCst);
        self.begin(socket, "write");
        self.submit(Job::Write { socket, data, done });
    }

    fn disconnect(&self, socket: SocketId, done: Completion<()>) {
        self.shared.counters.disconnect.fetch_add(1, Ordering::SeqCst);
        self.begin(socket, "disconnect");
        self.submit(Job::Disconnect { socket, done });
    }
}

impl Shared {
    fn run(&self, job: Job) {
        match job {
            Job::Connect { done } => {
                if let Some(status) = *self.refuse_status.lock() {
                    done.complete(ConnectOutcome::failed(status));
                    return;
                }
                let socket = SocketId(self.next_id.fetch_add(1, Ordering::SeqCst));
                self.sockets.insert(socket, Slot::default());
                done.complete(ConnectOutcome::ok(socket));
            }
            Job::Read {
                socket,
                max_len,
                done,
            } => {
                let Some(mut slot) = self.sockets.get_mut(&socket) else {
                    self.finish(socket);
                    return;
                };
                if slot.buffer.is_empty() && !slot.write_shut {
                    slot.parked = Some((max_len, done));
                    return;
                }
                let outcome = take(&mut slot, max_len);
                drop(slot);
                self.finish(socket);
                done.complete(outcome);
            }
            Job::Write { socket, data, done } => {
                let Some(mut slot) = self.sockets.get_mut(&socket) else {
                    self.finish(socket);
                    return;
                };
                if !slot.write_shut {
                    slot.buffer.extend_from_slice(&data);
                }
                let woken = slot.parked.take().map(|(max_len, parked)| {
                    let outcome = take(&mut slot, max_len);
                    (parked, outcome)
                });
                drop(slot);
                self.finish(socket);
                done.complete(());
                if let Some((parked, outcome)) = woken {
                    self.finish(socket);
                    parked.complete(outcome);
                }
            }
            Job::Disconnect { socket, done } => {
                if self.sockets.remove(&socket).is_none() {
                    self.finish(socket);
                    return;
                }
                self.finish(socket);
                done.complete(());
            }
            Job::ShutdownWrite { socket } => {
                let Some(mut slot) = self.sockets.get_mut(&socket) else {
                    return;
                };
                slot.write_shut = true;
                let woken = slot.parked.take();
                drop(slot);
                if let Some((_, parked)) = woken {
                    self.finish(socket);
                    parked.complete(ReadOutcome::last(Bytes::new()));
                }
            }
            Job::Sever { socket } => {
                if let Some((_, slot)) = self.sockets.remove(&socket) {
                    if slot.parked.is_some() {
                        self.finish(socket);
                    }
                }
            }
        }
    }

    fn finish(&self, socket: SocketId) {
        if let Some(mut outstanding) = self.in_flight.get_mut(&socket) {
            *outstanding = outstanding.saturating_sub(1);
        }
    }
}

/// Drain up to `max_len` bytes; end of stream rides along with the last batch.
fn take(slot: &mut Slot, max_len: usize) -> ReadOutcome {
    let n = slot.buffer.len().min(max_len);
    let payload = slot.buffer.split_to(n).freeze();
    ReadOutcome {
        payload,
        end_of_stream: slot.write_shut && slot.buffer.is_empty(),
    }
}

impl Drop for LoopbackHost {
    fn drop(&mut self) {
        drop(self.jobs.take());
        if let Some(dispatcher) = self.dispatcher.take() {
            let _ = dispatcher.join();
        }
    }
}

impl fmt::Debug for LoopbackHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackHost")
            .field("open_sockets", &self.open_sockets())
            .field("calls", &self.calls())
            .field("violations", &self.violations())
            .finish()
    }
}
