//! Identity and ordering utilities. Node identity itself is structural (see `NodeRef`); this
//! module provides the creation order used for sibling ordering and the short hashes shown
//! next to commits.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{HistoryError, Result};

/// Position of a node in the global creation sequence of its store.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct CreationOrder(u64);

impl CreationOrder {
    /// Returns the raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A source of strictly increasing creation orders.
#[derive(Clone, Debug, Default)]
pub struct OrderSource {
    next: u64,
}

impl OrderSource {
    /// Creates a source whose first order is zero.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Issues the next order. Never returns the same value twice.
    pub fn next_order(&mut self) -> CreationOrder {
        let ret = CreationOrder(self.next);
        self.next += 1;
        ret
    }

    /// Returns the number of orders issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

const HASH_BITS: u32 = 28;
const HASH_MASK: u32 = (1 << HASH_BITS) - 1;

/// A short commit hash, displayed as 7 lowercase hex digits.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct CommitHash(u32);

impl CommitHash {
    /// Builds a hash from its low 28 bits.
    pub fn from_bits(bits: u32) -> Self {
        CommitHash(bits & HASH_MASK)
    }

    /// Returns the numeric value.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:07x}", self.0)
    }
}

/// Draws random commit hashes. Every hash issued by one source is distinct.
#[derive(Clone, Debug)]
pub struct HashSource {
    rng: SmallRng,
    issued: HashSet<CommitHash>,
    mask: u32,
}

impl HashSource {
    /// Creates a source seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy(), HASH_MASK)
    }

    /// Creates a source with a fixed seed, giving reproducible hashes.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), HASH_MASK)
    }

    fn with_rng(rng: SmallRng, mask: u32) -> Self {
        HashSource {
            rng,
            issued: HashSet::new(),
            mask,
        }
    }

    /// Draws a hash not issued before by this source.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` once every hash value has been issued.
    pub fn next_hash(&mut self) -> Result<CommitHash> {
        if self.issued.len() as u64 > u64::from(self.mask) {
            return Err(HistoryError::CapacityExceeded);
        }
        Ok(self.draw())
    }

    /// Draws the first hash of a fresh source, which cannot be exhausted yet.
    pub(crate) fn first_hash(&mut self) -> CommitHash {
        debug_assert!(self.issued.is_empty());
        self.draw()
    }

    // Callers make sure at least one value is still free.
    fn draw(&mut self) -> CommitHash {
        loop {
            let bits: u32 = self.rng.gen();
            let hash = CommitHash::from_bits(bits & self.mask);
            if self.issued.insert(hash) {
                return hash;
            }
            log::trace!("hash collision on {}, drawing again", hash);
        }
    }

    /// Returns the number of hashes issued so far.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

impl Default for HashSource {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_hash_display_is_seven_hex_digits() {
    assert_eq!(CommitHash::from_bits(0xab).to_string(), "00000ab");
    assert_eq!(CommitHash::from_bits(u32::MAX).to_string(), "fffffff");
}

#[test]
fn test_seeded_hashes_are_reproducible() {
    let mut a = HashSource::with_seed(7);
    let mut b = HashSource::with_seed(7);
    let from_a: Vec<_> = (0..16).map(|_| a.next_hash().unwrap()).collect();
    let from_b: Vec<_> = (0..16).map(|_| b.next_hash().unwrap()).collect();
    assert_eq!(from_a, from_b);
    assert_eq!(a.issued(), 16);
}

#[test]
fn test_exhausted_hash_space_is_reported() {
    // A two-bit hash space holds four values.
    let mut source = HashSource::with_rng(SmallRng::seed_from_u64(3), 0b11);
    let mut drawn: Vec<_> = (0..4).map(|_| source.next_hash().unwrap()).collect();
    drawn.sort();
    assert_eq!(drawn, (0..4).map(CommitHash::from_bits).collect::<Vec<_>>());
    assert_eq!(source.next_hash(), Err(HistoryError::CapacityExceeded));
    assert_eq!(source.issued(), 4);
}

#[test]
fn test_order_source_is_monotonic() {
    let mut source = OrderSource::new();
    let first = source.next_order();
    let second = source.next_order();
    assert!(first < second);
    assert_eq!(source.issued(), 2);
}
