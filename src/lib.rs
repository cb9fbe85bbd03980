//! banrule - rule-matching engine for a BitTorrent peer-banning service.
//!
//! This crate evaluates live swarm evidence (peer IP addresses, peer-id
//! and client-name strings) against operator-defined ban rules and
//! produces tri-state verdicts. Aggregating verdicts into a ban decision
//! is left to the caller.
//!
//! # Features
//!
//! - **Tri-state verdicts**: TRUE (ban-worthy, with the firing rule
//!   name), FALSE (explicitly cleared), DEFAULT (no opinion)
//! - **Hybrid IP matching**: bloom pre-filter, exact-address set and a
//!   merged CIDR subnet index, built for rule sets with hundreds of
//!   thousands of entries
//! - **Dual-stack semantics**: IPv4 and IPv6 with explicit cross-family
//!   convertibility rules
//! - **Hot reload**: rule sets are immutable snapshots behind an atomic
//!   handle; reloads never block or tear concurrent queries
//! - **Pluggable string rules**: peer-id/client-name matching through an
//!   external pattern oracle
//!
//! # Quick Start
//!
//! ```
//! use banrule::{IpEntry, IpMatcher, MatchResult, RuleMatcher};
//!
//! let entries: Vec<IpEntry> = vec![
//!     "203.0.113.0/24".parse().unwrap(),
//!     "2001:db8::/32".parse().unwrap(),
//!     "198.51.100.7".parse().unwrap(),
//! ];
//! let matcher = IpMatcher::new("transit-1", "transit blocklist", &entries);
//!
//! let verdict = matcher.evaluate("203.0.113.55");
//! assert_eq!(verdict.rule_name(), Some("transit blocklist"));
//! assert_eq!(matcher.evaluate("192.0.2.1"), MatchResult::Default);
//!
//! // Unparseable evidence is no opinion, never an error.
//! assert_eq!(matcher.evaluate("-XL0012-abcdefghij"), MatchResult::Default);
//! ```
//!
//! # Concurrency
//!
//! Evaluation is synchronous, lock-free and read-only; matchers may be
//! shared across any number of peer-check threads. Reload recompiles the
//! whole rule set and publishes it with a single atomic swap, so readers
//! observe either the fully-old or the fully-new snapshot.

mod address;
mod bloom;
mod error;
mod match_result;

pub mod matcher;

// Re-export core types
pub use address::{BanAddress, IpEntry};
pub use bloom::BloomFilter;
pub use error::{Error, Result};
pub use match_result::MatchResult;

// Re-export matcher types
pub use matcher::{decide_chain, IpMatcher, PatternOracle, RuleMatcher, StringMatcher, SubnetIndex};
