//! # Sockbridge
//!
//! Blocking byte streams on top of callback-completed socket primitives.
//!
//! ## Architecture
//!
//! Sockbridge is structured in layers:
//!
//! - **`sockbridge-core`**: host capability trait, one-shot completions,
//!   errors, options, endpoints, lifecycle events
//! - **`sockbridge-stream`**: the blocking stream adapter, dialer and an
//!   in-memory loopback host
//! - **`sockbridge`**: Public API surface (this crate)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::{Read, Write};
//! use std::sync::Arc;
//! use sockbridge::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = Arc::new(LoopbackHost::new());
//! let dialer = Dialer::new(Arc::clone(&host));
//!
//! let mut stream = dialer.dial("127.0.0.1:9000")?;
//! stream.write_all(b"one fish two fish")?;
//! host.shutdown_write(stream.socket());
//!
//! let mut echoed = String::new();
//! stream.read_to_string(&mut echoed)?;
//! assert_eq!(echoed, "one fish two fish");
//! stream.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Bringing your own host
//!
//! Implement [`SocketPrimitives`](prelude::SocketPrimitives) for the
//! environment's socket API. Each method receives a
//! [`Completion`](prelude::Completion) that must be fired exactly once, from
//! any thread. The stream blocks the calling thread until it fires; there
//! is no timeout.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export core types
pub use bytes::Bytes;

pub use sockbridge_core::{endpoint, error, monitor, net_error, options, pending, primitives};
pub use sockbridge_stream::{addr, dialer, loopback, stream};

pub mod dev_tracing;
pub mod roundtrip;

/// Everything needed to dial, read and write.
pub mod prelude {
    pub use sockbridge_core::prelude::*;
    pub use sockbridge_stream::{
        BridgeStream, CallCounts, Dialer, LoopbackHost, PlaceholderAddr, ReadResult, StreamState,
    };

    pub use crate::roundtrip::{verify_echo, StepError};
}
