//! Scripted socket host shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use sockbridge_core::pending::Completion;
use sockbridge_core::primitives::{ConnectOutcome, ReadOutcome, SocketId, SocketPrimitives};

/// How completions reach the waiting caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Fired before the primitive call returns
    Inline,
    /// Fired from a freshly spawned thread after a short delay
    Thread,
}

/// Primitive invocation as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect { host: String, port: u16 },
    Read { socket: SocketId, max_len: usize },
    Write { socket: SocketId, data: Vec<u8> },
    Disconnect { socket: SocketId },
}

/// Host whose completions follow a script.
///
/// Scripted entries of `None` drop the completion without firing it. Once a
/// script runs out, connects succeed with handle 1 and reads report end of
/// stream.
pub struct ScriptedHost {
    delivery: Delivery,
    connects: Mutex<VecDeque<Option<ConnectOutcome>>>,
    reads: Mutex<VecDeque<Option<ReadOutcome>>>,
    drop_writes: AtomicBool,
    drop_disconnects: AtomicBool,
    calls: Mutex<Vec<Call>>,
    outstanding: Arc<AtomicBool>,
    overlaps: AtomicUsize,
}

/// Route stream logs to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

impl ScriptedHost {
    pub fn new(delivery: Delivery) -> Self {
        init_tracing();
        Self {
            delivery,
            connects: Mutex::new(VecDeque::new()),
            reads: Mutex::new(VecDeque::new()),
            drop_writes: AtomicBool::new(false),
            drop_disconnects: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            outstanding: Arc::new(AtomicBool::new(false)),
            overlaps: AtomicUsize::new(0),
        }
    }

    pub fn connect_with(self, outcome: ConnectOutcome) -> Self {
        self.connects.lock().push_back(Some(outcome));
        self
    }

    pub fn drop_connect(self) -> Self {
        self.connects.lock().push_back(None);
        self
    }

    pub fn read_with(self, outcome: ReadOutcome) -> Self {
        self.reads.lock().push_back(Some(outcome));
        self
    }

    pub fn drop_read(self) -> Self {
        self.reads.lock().push_back(None);
        self
    }

    pub fn drop_writes(self) -> Self {
        self.drop_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn drop_disconnects(self) -> Self {
        self.drop_disconnects.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| matches(c)).count()
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    fn begin(&self, call: Call) {
        if self.outstanding.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.calls.lock().push(call);
    }

    fn deliver<T: Send + 'static>(&self, done: Completion<T>, value: Option<T>) {
        let outstanding = Arc::clone(&self.outstanding);
        let Some(value) = value else {
            outstanding.store(false, Ordering::SeqCst);
            drop(done);
            return;
        };
        match self.delivery {
            Delivery::Inline => {
                outstanding.store(false, Ordering::SeqCst);
                done.complete(value);
            }
            Delivery::Thread => {
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(2));
                    outstanding.store(false, Ordering::SeqCst);
                    done.complete(value);
                });
            }
        }
    }
}

impl SocketPrimitives for ScriptedHost {
    fn connect(&self, host: &str, port: u16, done: Completion<ConnectOutcome>) {
        self.begin(Call::Connect {
            host: host.to_string(),
            port,
        });
        let outcome = self
            .connects
            .lock()
            .pop_front()
            .unwrap_or(Some(ConnectOutcome::ok(SocketId(1))));
        self.deliver(done, outcome);
    }

    fn read(&self, socket: SocketId, max_len: usize, done: Completion<ReadOutcome>) {
        self.begin(Call::Read { socket, max_len });
        let outcome = self
            .reads
            .lock()
            .pop_front()
            .unwrap_or(Some(ReadOutcome::last(Bytes::new())));
        self.deliver(done, outcome);
    }

    fn write(&self, socket: SocketId, data: Bytes, done: Completion<()>) {
        self.begin(Call::Write {
            socket,
            data: data.to_vec(),
        });
        let ack = (!self.drop_writes.load(Ordering::SeqCst)).then_some(());
        self.deliver(done, ack);
    }

    fn disconnect(&self, socket: SocketId, done: Completion<()>) {
        self.begin(Call::Disconnect { socket });
        let ack = (!self.drop_disconnects.load(Ordering::SeqCst)).then_some(());
        self.deliver(done, ack);
    }
}

pub fn is_connect(call: &Call) -> bool {
    matches!(call, Call::Connect { .. })
}

pub fn is_read(call: &Call) -> bool {
    matches!(call, Call::Read { .. })
}

pub fn is_write(call: &Call) -> bool {
    matches!(call, Call::Write { .. })
}

pub fn is_disconnect(call: &Call) -> bool {
    matches!(call, Call::Disconnect { .. })
}
