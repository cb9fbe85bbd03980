//! Parsed address types shared by rule entries and query evidence.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::Error;

/// One parsed rule entry: an IP address with an optional CIDR prefix length.
///
/// Entries are parsed by the configuration layer before they reach a
/// matcher; parse failures are surfaced there as [`Error`] and never make
/// it into a compiled rule set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IpEntry {
    addr: IpAddr,
    prefix: Option<u8>,
}

impl IpEntry {
    /// Create an entry with a prefix length, validating it against the
    /// address family.
    pub fn new(addr: IpAddr, prefix: Option<u8>) -> Result<Self, Error> {
        if let Some(len) = prefix {
            let max = match addr {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            };
            if len > max {
                return Err(Error::InvalidPrefixLength { addr, prefix: len });
            }
        }
        Ok(Self { addr, prefix })
    }

    /// Create a single-host entry without a prefix.
    pub fn host(addr: IpAddr) -> Self {
        Self { addr, prefix: None }
    }

    /// The entry's address.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// The entry's prefix length, if any.
    pub fn prefix(&self) -> Option<u8> {
        self.prefix
    }
}

impl FromStr for IpEntry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text.split_once('/') {
            Some((addr, len)) => {
                let addr: IpAddr = addr
                    .parse()
                    .map_err(|_| Error::InvalidIpPattern(text.to_string()))?;
                let len: u8 = len
                    .parse()
                    .map_err(|_| Error::InvalidIpPattern(text.to_string()))?;
                Self::new(addr, Some(len))
            }
            None => {
                let addr: IpAddr = text
                    .parse()
                    .map_err(|_| Error::InvalidIpPattern(text.to_string()))?;
                Ok(Self::host(addr))
            }
        }
    }
}

impl fmt::Display for IpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(len) => write!(f, "{}/{}", self.addr, len),
            None => write!(f, "{}", self.addr),
        }
    }
}

/// An address under dual-stack equality semantics, as presented by a peer.
///
/// Two addresses are equal only if both the numeric value and the
/// cross-family convertibility flag agree, so an IPv4 address and its
/// IPv6-mapped counterpart never compare equal.
#[derive(Clone, Copy, Debug)]
pub struct BanAddress {
    addr: IpAddr,
    v4_convertible: bool,
}

impl BanAddress {
    pub fn new(addr: IpAddr) -> Self {
        let v4_convertible = match addr {
            IpAddr::V4(_) => true,
            IpAddr::V6(v6) => v6.to_ipv4_mapped().is_some(),
        };
        Self {
            addr,
            v4_convertible,
        }
    }

    /// Parse raw query evidence. Returns `None` for anything that is not
    /// an IP address; callers turn that into a `Default` verdict.
    pub fn parse(content: &str) -> Option<Self> {
        content.trim().parse().ok().map(Self::new)
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Whether the address is losslessly representable as IPv4: true for
    /// IPv4 itself and for IPv4-mapped IPv6 (`::ffff:a.b.c.d`).
    pub fn is_v4_convertible(&self) -> bool {
        self.v4_convertible
    }

    /// Canonical string form, used as the bloom filter key.
    pub fn canonical(&self) -> String {
        self.addr.to_string()
    }
}

impl PartialEq for BanAddress {
    fn eq(&self, other: &Self) -> bool {
        self.v4_convertible == other.v4_convertible && self.addr == other.addr
    }
}

impl Eq for BanAddress {}

impl Hash for BanAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr.hash(state);
        self.v4_convertible.hash(state);
    }
}

impl fmt::Display for BanAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}
