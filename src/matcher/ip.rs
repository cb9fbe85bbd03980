//! Hybrid bloom / exact-set / subnet-index IP rule matcher.

use ahash::AHashSet;
use arc_swap::ArcSwap;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::IpAddr;
use std::sync::Arc;

use super::{RuleMatcher, SubnetIndex};
use crate::address::{BanAddress, IpEntry};
use crate::bloom::BloomFilter;
use crate::MatchResult;

/// IPv4 prefixes at or above this length (at most ~4096 addresses) are
/// expanded to individual hosts: cheap exact lookups for small ranges
/// beat a subnet scan. IPv6 prefixes are never expanded since allocations
/// are conventionally /64 or wider.
const EXPAND_PREFIX_MIN: u8 = 20;

/// Target false-positive rate for the exact-set bloom filter.
const BLOOM_FPR: f64 = 0.01;

/// One immutable compiled snapshot of the rule set. Replaced wholesale
/// on reload, never mutated in place.
struct IpRuleState {
    rule_name: Arc<str>,
    /// Deduplicated exact addresses, including expanded small v4 ranges.
    exact: AHashSet<BanAddress>,
    /// Pre-filter over the exact set's canonical string forms.
    bloom: BloomFilter,
    /// Merged prefixes that were kept as subnets.
    subnets: SubnetIndex,
}

/// IpMatcher evaluates peer addresses against an IP blacklist rule of
/// exact addresses and CIDR ranges, sized for hundreds of thousands of
/// entries.
///
/// Lookups combine a bloom pre-filter, an authoritative exact-set scan
/// and a merged subnet index; exact and subnet rules are independent
/// categories, so a failed exact verification never suppresses a subnet
/// hit.
///
/// The compiled state sits behind a single atomically swapped handle:
/// readers take one snapshot per evaluation and [`reload`](Self::reload)
/// publishes a fully rebuilt replacement, so no query ever observes a
/// half-updated rule set.
pub struct IpMatcher {
    rule_id: String,
    state: ArcSwap<IpRuleState>,
}

impl IpMatcher {
    /// Compile a matcher from already-parsed rule entries.
    pub fn new(rule_id: impl Into<String>, rule_name: &str, entries: &[IpEntry]) -> Self {
        Self {
            rule_id: rule_id.into(),
            state: ArcSwap::from_pointee(compile(rule_name, entries)),
        }
    }

    /// Recompile from a fresh entry list and publish the new snapshot
    /// atomically. Concurrent queries see either the old or the new rule
    /// set in full.
    pub fn reload(&self, rule_name: &str, entries: &[IpEntry]) {
        self.state.store(Arc::new(compile(rule_name, entries)));
    }

    /// Stable key identifying this rule across reloads.
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Display name of the currently loaded rule.
    pub fn rule_name(&self) -> Arc<str> {
        self.state.load().rule_name.clone()
    }

    /// Number of exact addresses in the current snapshot.
    pub fn exact_count(&self) -> usize {
        self.state.load().exact.len()
    }

    /// Number of merged subnets in the current snapshot.
    pub fn subnet_count(&self) -> usize {
        self.state.load().subnets.len()
    }
}

impl RuleMatcher for IpMatcher {
    fn evaluate(&self, content: &str) -> MatchResult {
        let Some(addr) = BanAddress::parse(content) else {
            return MatchResult::Default;
        };
        let state = self.state.load();

        // A bloom miss proves the address is not in the exact set; a hit
        // still needs the authoritative scan.
        if state.bloom.contains(addr.canonical().as_bytes()) && state.exact.contains(&addr) {
            return MatchResult::True(state.rule_name.clone());
        }

        // Always consult the subnet index: subnet rules are independent
        // of the exact set, bloom false positives included.
        if state.subnets.contains(&addr.addr()) {
            return MatchResult::True(state.rule_name.clone());
        }

        MatchResult::Default
    }

    fn matcher_identifier(&self) -> &'static str {
        "banrule:ipmatcher"
    }

    fn matcher_name(&self) -> String {
        format!("IP blacklist rule: {}", self.state.load().rule_name)
    }
}

/// Classify entries into the exact set and the subnet index, then derive
/// the bloom filter from the final exact set.
fn compile(rule_name: &str, entries: &[IpEntry]) -> IpRuleState {
    let mut exact: AHashSet<BanAddress> = AHashSet::new();
    let mut subnets = SubnetIndex::new();

    for entry in entries {
        match (entry.addr(), entry.prefix()) {
            (IpAddr::V4(v4), Some(len)) if len >= EXPAND_PREFIX_MIN => {
                // Prefix length validated at parse time.
                if let Ok(net) = Ipv4Net::new(v4, len) {
                    // hosts() excludes the network and broadcast
                    // addresses except for /31 and /32.
                    for host in net.hosts() {
                        exact.insert(BanAddress::new(IpAddr::V4(host)));
                    }
                }
            }
            (IpAddr::V4(v4), Some(len)) => {
                if let Ok(net) = Ipv4Net::new(v4, len) {
                    subnets.insert(IpNet::V4(net));
                }
            }
            (IpAddr::V6(v6), Some(len)) => {
                if let Ok(net) = Ipv6Net::new(v6, len) {
                    subnets.insert(IpNet::V6(net));
                }
            }
            // Prefix stripped: a bare address and the same address
            // written as a one-host range compare equal.
            (addr, None) => {
                exact.insert(BanAddress::new(addr));
            }
        }
    }

    let mut bloom = BloomFilter::with_fpr(exact.len(), BLOOM_FPR);
    for addr in &exact {
        bloom.insert(addr.canonical().as_bytes());
    }

    log::debug!(
        "compiled IP rule '{}': {} exact addresses, {} merged subnets",
        rule_name,
        exact.len(),
        subnets.len()
    );

    IpRuleState {
        rule_name: Arc::from(rule_name),
        exact,
        bloom,
        subnets,
    }
}
