//! End-to-end echo verification.
//!
//! Dials an address, writes a payload, reads the same number of bytes back
//! and compares them. Each failing step is reported with a short message
//! naming it; there is no partial success.

use sockbridge_core::error::BridgeError;
use sockbridge_core::primitives::SocketPrimitives;
use sockbridge_stream::Dialer;
use thiserror::Error;
use tracing::info;

/// Failure of one step of [`verify_echo`].
#[derive(Error, Debug)]
pub enum StepError {
    /// A stream operation failed.
    #[error("could not {step}: {source}")]
    Step {
        /// The step that failed
        step: &'static str,
        /// Underlying stream error
        #[source]
        source: BridgeError,
    },

    /// The bytes read back differ from the bytes written.
    #[error("got different data back: {sent:?} != {received:?}")]
    Mismatch {
        /// Bytes written
        sent: Vec<u8>,
        /// Bytes read back
        received: Vec<u8>,
    },
}

trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T, StepError>;
}

impl<T> StepContext<T> for Result<T, BridgeError> {
    fn step(self, step: &'static str) -> Result<T, StepError> {
        self.map_err(|source| StepError::Step { step, source })
    }
}

/// Write `payload` to `address` and check that the peer echoes it back.
///
/// Returns the bytes read back.
///
/// # Errors
///
/// [`StepError::Step`] naming the first failing step (`dial`, `write data`,
/// `read data`, `close stream`), or [`StepError::Mismatch`] if the echo
/// differs or ends early.
pub fn verify_echo<P>(
    dialer: &Dialer<P>,
    address: &str,
    payload: &[u8],
) -> Result<Vec<u8>, StepError>
where
    P: SocketPrimitives + Clone,
{
    let stream = dialer.dial(address).step("dial")?;
    stream.write(payload).step("write data")?;

    let mut received = vec![0u8; payload.len()];
    let mut filled = 0;
    while filled < payload.len() {
        let result = stream.read_chunk(&mut received[filled..]).step("read data")?;
        filled += result.n;
        if result.end_of_stream {
            break;
        }
    }
    received.truncate(filled);

    stream.close().step("close stream")?;

    if received != payload {
        return Err(StepError::Mismatch {
            sent: payload.to_vec(),
            received,
        });
    }
    info!(address, bytes = received.len(), "echo verified");
    Ok(received)
}
