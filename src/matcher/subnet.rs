//! Merged CIDR prefix set with containment queries.

use ipnet::IpNet;
use std::net::IpAddr;

/// SubnetIndex answers "does any configured prefix contain this address"
/// against overlapping, nested prefixes from multiple blocklist sources.
///
/// Candidates are merged on insertion so that no member contains another:
/// a candidate already covered by a member is dropped, and members covered
/// by the candidate are evicted before it is added. Checking both
/// containment directions makes the merge insertion-order independent and
/// idempotent.
///
/// Queries are a linear scan over the merged set; the merge keeps that
/// set minimal. Cross-family containment is always false.
#[derive(Clone, Debug, Default)]
pub struct SubnetIndex {
    subnets: Vec<IpNet>,
}

impl SubnetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a prefix, merging it with the existing set.
    ///
    /// The prefix is normalized to its network address first so that
    /// host bits in the input cannot defeat deduplication.
    pub fn insert(&mut self, net: IpNet) {
        let net = net.trunc();
        if self.subnets.iter().any(|existing| existing.contains(&net)) {
            return;
        }
        self.subnets.retain(|existing| !net.contains(existing));
        self.subnets.push(net);
    }

    /// True iff any member prefix contains the address under CIDR rules
    /// for its family.
    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.subnets.iter().any(|net| net.contains(addr))
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    /// Iterate over the merged prefixes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &IpNet> {
        self.subnets.iter()
    }
}

impl FromIterator<IpNet> for SubnetIndex {
    fn from_iter<I: IntoIterator<Item = IpNet>>(iter: I) -> Self {
        let mut index = Self::new();
        for net in iter {
            index.insert(net);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn nets(patterns: &[&str]) -> Vec<IpNet> {
        patterns.iter().map(|p| p.parse().unwrap()).collect()
    }

    fn as_set(index: &SubnetIndex) -> HashSet<IpNet> {
        index.iter().copied().collect()
    }

    #[test]
    fn test_containment() {
        let index: SubnetIndex = nets(&["203.0.113.0/24", "2001:db8::/32"])
            .into_iter()
            .collect();

        assert!(index.contains(&"203.0.113.55".parse().unwrap()));
        assert!(!index.contains(&"203.0.114.1".parse().unwrap()));
        assert!(index.contains(&"2001:db8:1::1".parse().unwrap()));
        assert!(!index.contains(&"2001:db9::1".parse().unwrap()));
    }

    #[test]
    fn test_cross_family_never_contains() {
        let index: SubnetIndex = nets(&["0.0.0.0/0"]).into_iter().collect();
        assert!(!index.contains(&"2001:db8::1".parse().unwrap()));

        let index: SubnetIndex = nets(&["::/0"]).into_iter().collect();
        assert!(!index.contains(&"203.0.113.1".parse().unwrap()));
    }

    #[test]
    fn test_merge_drops_nested_v6() {
        let index: SubnetIndex = nets(&["2001:db8::/32", "2001:db8::/48"])
            .into_iter()
            .collect();
        assert_eq!(index.len(), 1);
        assert_eq!(as_set(&index), nets(&["2001:db8::/32"]).into_iter().collect());
    }

    #[test]
    fn test_merge_evicts_when_wider_arrives_late() {
        // The narrow prefix arrives first; the wider one must evict it.
        let index: SubnetIndex = nets(&["2001:db8::/48", "2001:db8::/32"])
            .into_iter()
            .collect();
        assert_eq!(as_set(&index), nets(&["2001:db8::/32"]).into_iter().collect());
    }

    #[test]
    fn test_merge_order_independence() {
        let input = ["10.0.0.0/8", "10.1.0.0/16", "10.1.2.0/24", "192.168.0.0/16"];
        let expected: HashSet<IpNet> = nets(&["10.0.0.0/8", "192.168.0.0/16"])
            .into_iter()
            .collect();

        // All rotations of the input produce the same merged set.
        for shift in 0..input.len() {
            let mut rotated = input.to_vec();
            rotated.rotate_left(shift);
            let index: SubnetIndex = nets(&rotated).into_iter().collect();
            assert_eq!(as_set(&index), expected, "rotation {}", shift);
        }
    }

    #[test]
    fn test_merge_idempotence() {
        let index: SubnetIndex = nets(&["10.0.0.0/8", "10.1.0.0/16", "172.16.0.0/12"])
            .into_iter()
            .collect();
        let remerged: SubnetIndex = index.iter().copied().collect();
        assert_eq!(as_set(&index), as_set(&remerged));
    }

    #[test]
    fn test_duplicate_dropped() {
        let index: SubnetIndex = nets(&["10.0.0.0/8", "10.0.0.0/8"]).into_iter().collect();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_host_bits_normalized() {
        // 10.0.0.99/8 and 10.1.2.3/8 denote the same network.
        let index: SubnetIndex = nets(&["10.0.0.99/8", "10.1.2.3/8"]).into_iter().collect();
        assert_eq!(index.len(), 1);
        assert!(index.contains(&"10.200.1.1".parse().unwrap()));
    }

    #[test]
    fn test_empty_index() {
        let index = SubnetIndex::new();
        assert!(index.is_empty());
        assert!(!index.contains(&"203.0.113.1".parse().unwrap()));
    }
}
