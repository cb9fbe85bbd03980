//! Bloom filter pre-screening the exact-address scan.
//!
//! False positives are possible and verified by an authoritative scan;
//! false negatives are not: a miss here proves the element is absent.

use std::f64::consts::LN_2;
use std::io::Cursor;

use bitvec::prelude::*;

/// Fixed-size probabilistic membership filter over byte strings.
///
/// Sized from the expected element count and a target false-positive
/// rate using the standard optimum:
/// `m = -n*ln(p) / ln(2)^2`, `k = (m/n) * ln(2)`.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
}

impl BloomFilter {
    /// Create a filter sized for `expected` elements at the given target
    /// false-positive rate.
    ///
    /// An empty expected set degenerates to a one-bit filter that still
    /// answers probes without branching at the call site.
    pub fn with_fpr(expected: usize, target_fpr: f64) -> Self {
        if expected == 0 {
            return Self {
                bits: bitvec![u8, Lsb0; 0; 1],
                k: 1,
                m: 1,
            };
        }
        let n = expected as f64;
        let m = ((-n * target_fpr.ln() / (LN_2 * LN_2)).ceil() as usize).max(1);
        let k = (((m as f64 / n) * LN_2).round() as usize).clamp(1, 32);
        Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
            m,
        }
    }

    /// Insert an element. Afterwards `contains` is guaranteed to return
    /// true for it.
    pub fn insert(&mut self, element: &[u8]) {
        for pos in self.positions(element) {
            self.bits.set(pos, true);
        }
    }

    /// Probe for an element: `false` means definitely absent, `true`
    /// means present or false positive.
    pub fn contains(&self, element: &[u8]) -> bool {
        self.positions(element).into_iter().all(|pos| self.bits[pos])
    }

    /// Filter size in bits.
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Number of hash functions.
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Compute the k bit positions for an element via double hashing:
    /// `h(i) = h1 + i * h2`.
    fn positions(&self, element: &[u8]) -> Vec<usize> {
        let h1 = seeded_hash(element, 0);
        let h2 = seeded_hash(element, 1);
        let m = self.m as u64;
        (0..self.k)
            .map(|i| (h1.wrapping_add((i as u64).wrapping_mul(h2)) % m) as usize)
            .collect()
    }
}

/// MurmurHash3 x64 128-bit, truncated to the low 64 bits.
fn seeded_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0) as u64
}
