//! Sockbridge Core
//!
//! This crate contains the host-agnostic building blocks for turning
//! callback-completed socket primitives into blocking streams:
//! - Error types (`error`)
//! - Host primitive capability and handles (`primitives`)
//! - One-shot completion hand-off (`pending`)
//! - Stream options (`options`)
//! - `host:port` addressing (`endpoint`)
//! - Lifecycle events (`monitor`)
//! - Lost-completion poisoning (`poison`)
//! - Host status code names (`net_error`)

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
pub mod endpoint;
pub mod error;
pub mod monitor;
pub mod net_error;
pub mod options;
pub mod pending;
pub mod poison;
pub mod primitives;

// Optional: a small prelude to make downstream crates ergonomic.
// Keep it minimal to avoid API lock-in.
pub mod prelude {
    pub use crate::endpoint::Endpoint;
    pub use crate::error::BridgeError;
    pub use crate::monitor::{create_monitor, StreamEvent, StreamEventSender, StreamMonitor};
    pub use crate::options::{ConnectStatusPolicy, StreamOptions};
    pub use crate::pending::{completion_pair, Completion, PendingOperation};
    pub use crate::poison::PoisonGuard;
    pub use crate::primitives::{ConnectOutcome, ReadOutcome, SocketId, SocketPrimitives};
}
