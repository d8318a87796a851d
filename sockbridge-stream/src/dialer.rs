//! Address-form dialing.
//!
//! Client libraries that accept a custom transport usually hand it an
//! address string such as `"satellite.example.com:7777"`. [`Dialer`] splits
//! that address and opens a [`BridgeStream`] over the injected primitives.

use sockbridge_core::endpoint::Endpoint;
use sockbridge_core::error::Result;
use sockbridge_core::options::StreamOptions;
use sockbridge_core::primitives::SocketPrimitives;
use tracing::debug;

use crate::stream::BridgeStream;

/// Opens bridge streams from `host:port` addresses.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use sockbridge_stream::{Dialer, LoopbackHost};
///
/// let dialer = Dialer::new(Arc::new(LoopbackHost::new()));
/// let stream = dialer.dial("127.0.0.1:9000").unwrap();
/// assert_eq!(stream.endpoint().port(), 9000);
/// ```
#[derive(Debug, Clone)]
pub struct Dialer<P> {
    primitives: P,
    options: StreamOptions,
}

impl<P: SocketPrimitives + Clone> Dialer<P> {
    /// Dialer with default stream options.
    pub fn new(primitives: P) -> Self {
        Self::with_options(primitives, StreamOptions::default())
    }

    /// Dialer whose streams use `options`.
    pub fn with_options(primitives: P, options: StreamOptions) -> Self {
        Self {
            primitives,
            options,
        }
    }

    /// Parse `address` and open a stream to it.
    ///
    /// # Errors
    ///
    /// Address errors from [`Endpoint::parse`] (no primitive is issued) and
    /// connect errors from [`BridgeStream::open_endpoint`].
    pub fn dial(&self, address: &str) -> Result<BridgeStream<P>> {
        debug!(address, "dial");
        let endpoint = Endpoint::parse(address)?;
        BridgeStream::open_endpoint(self.primitives.clone(), endpoint, self.options.clone())
    }

    /// Options applied to dialed streams.
    pub const fn options(&self) -> &StreamOptions {
        &self.options
    }
}
