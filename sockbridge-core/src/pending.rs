//! One-shot completion hand-off between a socket host and a blocked caller.
//!
//! Every primitive issued by the adapter is paired with exactly one
//! [`PendingOperation`]. The host receives the matching [`Completion`] and
//! fires it once, from any thread; the caller blocks in
//! [`PendingOperation::wait`] until that happens.
//!
//! The pair is a `flume::bounded(1)` channel: a single value slot and a
//! single fire. `Completion::complete` consumes the completion, so firing
//! twice does not type-check.
//!
//! # Example
//!
//! ```rust
//! use sockbridge_core::pending::completion_pair;
//!
//! let (done, pending) = completion_pair::<u32>("connect");
//! std::thread::spawn(move || done.complete(7));
//! assert_eq!(pending.wait().unwrap(), 7);
//! ```

use flume::{Receiver, Sender};
use tracing::trace;

use crate::error::{BridgeError, Result};

/// Create a linked completion and pending operation for the named primitive.
#[must_use]
pub fn completion_pair<T>(op: &'static str) -> (Completion<T>, PendingOperation<T>) {
    let (tx, rx) = flume::bounded(1);
    (Completion { tx, op }, PendingOperation { rx, op })
}

/// Single-use notifier handed to the socket host.
#[must_use = "a completion must be fired or the waiting caller observes a dropped completion"]
pub struct Completion<T> {
    tx: Sender<T>,
    op: &'static str,
}

impl<T> Completion<T> {
    /// Deliver the operation's result, waking the blocked caller.
    pub fn complete(self, value: T) {
        if self.tx.send(value).is_err() {
            // The waiter is gone; nothing left to wake.
            trace!(op = self.op, "completion fired after waiter went away");
        }
    }

    /// Name of the primitive this completion belongs to.
    pub const fn op(&self) -> &'static str {
        self.op
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion").field("op", &self.op).finish()
    }
}

/// The caller's half of an in-flight primitive.
#[must_use = "a pending operation does nothing unless waited on"]
pub struct PendingOperation<T> {
    rx: Receiver<T>,
    op: &'static str,
}

impl<T> PendingOperation<T> {
    /// Block the calling thread until the completion fires.
    ///
    /// There is no timeout: a host that never fires the completion blocks the
    /// caller forever.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::CompletionDropped`] if the host dropped the
    /// completion without firing it.
    pub fn wait(self) -> Result<T> {
        self.rx
            .recv()
            .map_err(|_| BridgeError::CompletionDropped { op: self.op })
    }

    /// Name of the primitive this operation waits on.
    pub const fn op(&self) -> &'static str {
        self.op
    }
}

impl<T> std::fmt::Debug for PendingOperation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingOperation")
            .field("op", &self.op)
            .finish()
    }
}
