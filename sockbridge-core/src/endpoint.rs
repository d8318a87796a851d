//! Endpoint addressing for bridge streams.
//!
//! Higher-level clients dial addresses of the form `host:port`. The socket
//! host resolves names itself, so the host part is kept as a string and
//! never resolved here.

use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Remote endpoint of a bridge stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidEndpoint`] if `host` is empty and
    /// [`BridgeError::InvalidPort`] if `port` is zero.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(BridgeError::invalid_endpoint("host cannot be empty"));
        }
        if port == 0 {
            return Err(BridgeError::invalid_port("port 0 is not dialable"));
        }
        Ok(Self { host, port })
    }

    /// Parse an endpoint from a string.
    ///
    /// Supported formats:
    /// - `127.0.0.1:7777`
    /// - `satellite.example.com:7777`
    /// - `[::1]:7777` (IPv6)
    ///
    /// # Examples
    ///
    /// ```
    /// use sockbridge_core::endpoint::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("127.0.0.1:9000").unwrap();
    /// assert_eq!(endpoint.host(), "127.0.0.1");
    /// assert_eq!(endpoint.port(), 9000);
    ///
    /// let endpoint = Endpoint::parse("[::1]:9000").unwrap();
    /// assert_eq!(endpoint.host(), "::1");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Host name or address literal.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port number.
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Endpoint {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| BridgeError::invalid_endpoint(format!("missing port in '{s}'")))?;

        let host = match host.strip_prefix('[') {
            Some(inner) => inner.strip_suffix(']').ok_or_else(|| {
                BridgeError::invalid_endpoint(format!("unterminated IPv6 literal in '{s}'"))
            })?,
            None if host.contains(':') => {
                return Err(BridgeError::invalid_endpoint(format!(
                    "IPv6 host must be bracketed in '{s}'"
                )));
            }
            None => host,
        };

        let port = port
            .parse::<u16>()
            .map_err(|_| BridgeError::invalid_port(port.to_string()))?;

        Self::new(host, port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
