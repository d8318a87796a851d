//! # Sockbridge Stream
//!
//! Blocking byte streams over callback-completed socket primitives.
//!
//! ## Overview
//!
//! A socket host exposes `connect`, `read`, `write` and `disconnect` as
//! operations that report their result through a completion fired later,
//! on another thread. [`BridgeStream`] turns that into a conventional
//! blocking stream:
//! - **open**: one connect primitive, blocks until the handle arrives
//! - **read**: one read primitive per call, end of stream reported with the
//!   bytes that accompany it
//! - **write**: one write primitive per call, full-buffer semantics
//! - **close**: one disconnect primitive; the stream is unusable afterwards
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sockbridge_stream::{Dialer, LoopbackHost};
//!
//! let dialer = Dialer::new(Arc::new(LoopbackHost::new()));
//! let stream = dialer.dial("127.0.0.1:9000").unwrap();
//!
//! stream.write(b"hello").unwrap();
//! let mut buf = [0u8; 16];
//! let result = stream.read_chunk(&mut buf).unwrap();
//! assert_eq!(&buf[..result.n], b"hello");
//! stream.close().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Injected host**: primitives come from a [`SocketPrimitives`]
//!   implementation passed to the constructor
//! - **One outstanding primitive per socket**, even across threads
//! - **`std::io` integration**: `Read` and `Write` for the stream and for
//!   shared references to it
//!
//! [`SocketPrimitives`]: sockbridge_core::primitives::SocketPrimitives

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

pub mod addr;
pub mod dialer;
pub mod loopback;
pub mod stream;

pub use addr::PlaceholderAddr;
pub use dialer::Dialer;
pub use loopback::{CallCounts, LoopbackHost};
pub use stream::{BridgeStream, ReadResult, StreamState};
