//! Address placeholder returned by bridge stream accessors.
//!
//! Socket hosts hand out opaque handles, not addresses, so local and remote
//! addresses are unknown. [`PlaceholderAddr`] carries no information and
//! renders as an empty string.

use std::fmt;

/// Non-identifying address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlaceholderAddr;

impl PlaceholderAddr {
    /// Network name; always empty.
    pub const fn network(&self) -> &'static str {
        ""
    }
}

impl fmt::Display for PlaceholderAddr {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}
