//! Error types for banrule.

use std::net::IpAddr;
use thiserror::Error;

/// Error type for rule compilation.
///
/// Only rule-set construction can fail; evaluation never returns an error —
/// uncertainty collapses to [`MatchResult::Default`].
///
/// [`MatchResult::Default`]: crate::MatchResult::Default
#[derive(Error, Debug)]
pub enum Error {
    /// Rule entry text is not an IP address or CIDR pattern
    #[error("invalid IP rule pattern: {0}")]
    InvalidIpPattern(String),

    /// Prefix length out of range for the address family
    #[error("invalid prefix length /{prefix} for address {addr}")]
    InvalidPrefixLength { addr: IpAddr, prefix: u8 },
}

/// Result type alias for banrule operations.
pub type Result<T> = std::result::Result<T, Error>;
