//! RAII guard marking a stream unusable when a wait ends without a completion.
//!
//! # The Problem
//!
//! A bridge stream hands every primitive a completion and blocks until the
//! host fires it. If the host drops the completion instead, the caller wakes
//! with an error but the host socket is in an unknown state: a write may or
//! may not have reached the wire, a read may have consumed bytes.
//!
//! # The Solution
//!
//! `PoisonGuard::new()` sets the stream's flag before the wait. Only
//! `disarm()`, called once the completion value is in hand, clears it. Any
//! early return (the `?` on a dropped completion) leaves the flag set.
//!
//! # Example
//!
//! ```rust
//! use sockbridge_core::pending::completion_pair;
//! use sockbridge_core::poison::PoisonGuard;
//!
//! let mut poisoned = false;
//! let (done, pending) = completion_pair::<()>("write");
//! drop(done);
//!
//! {
//!     let guard = PoisonGuard::new(&mut poisoned);
//!     if pending.wait().is_ok() {
//!         guard.disarm();
//!     }
//! }
//! assert!(poisoned);
//! ```
//!
//! Once poisoned, the stream rejects reads and writes; only close is
//! attempted.

/// A RAII guard that marks a stream as poisoned if dropped before disarmed.
pub struct PoisonGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> PoisonGuard<'a> {
    /// Create a new guard, immediately marking the stream as poisoned.
    #[inline]
    pub fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }

    /// Disarm the guard, marking the stream as healthy.
    ///
    /// Call only after the completion has been received.
    #[inline]
    pub fn disarm(self) {
        *self.flag = false;
    }
}
