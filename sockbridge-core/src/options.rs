//! Stream configuration options
//!
//! Options that shape how a bridge stream interprets host completions.

use crate::monitor::StreamEventSender;

/// Default upper bound on the length requested by one read primitive (64KB).
pub const DEFAULT_MAX_READ_LEN: usize = 64 * 1024;

/// How the status code of a connect completion is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectStatusPolicy {
    /// Any non-zero status is a connect failure.
    #[default]
    Strict,
    /// The status is ignored and whatever handle the host produced is used.
    ///
    /// Matches hosts that report informational codes on success.
    Lenient,
}

/// Bridge stream configuration options.
///
/// # Examples
///
/// ```
/// use sockbridge_core::options::{ConnectStatusPolicy, StreamOptions};
///
/// let opts = StreamOptions::default()
///     .with_connect_status(ConnectStatusPolicy::Lenient)
///     .with_max_read_len(4096);
/// assert_eq!(opts.max_read_len, 4096);
/// ```
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Connect status interpretation
    ///
    /// - `Strict` (default): non-zero status fails `open`
    /// - `Lenient`: status ignored
    pub connect_status: ConnectStatusPolicy,

    /// Maximum bytes requested by a single read primitive
    ///
    /// Caller buffers larger than this are filled by at most this many bytes
    /// per call.
    /// - Default: 65536 (64KB)
    pub max_read_len: usize,

    /// Lifecycle event sink
    ///
    /// - `None` (default): no events
    /// - `Some(sender)`: connect, end-of-stream and close events are sent
    pub monitor: Option<StreamEventSender>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            connect_status: ConnectStatusPolicy::Strict,
            max_read_len: DEFAULT_MAX_READ_LEN,
            monitor: None,
        }
    }
}

impl StreamOptions {
    /// Create new stream options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connect status interpretation.
    pub fn with_connect_status(mut self, policy: ConnectStatusPolicy) -> Self {
        self.connect_status = policy;
        self
    }

    /// Set maximum read length per primitive.
    ///
    /// A value of zero is raised to one so reads can make progress.
    pub fn with_max_read_len(mut self, len: usize) -> Self {
        self.max_read_len = len.max(1);
        self
    }

    /// Install a lifecycle event sink.
    pub fn with_monitor(mut self, sender: StreamEventSender) -> Self {
        self.monitor = Some(sender);
        self
    }
}
