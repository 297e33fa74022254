//! Shard identifiers, sets and maps
//!
//! Identifiers `[0, k)` are data-role shards, `[k, n)` are coding-role
//! shards. The role is derived from the identifier and never stored.

use crate::error::{Result, StripeGateError};
use crate::{DATA_SHARDS, TOTAL_SHARDS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier of one of the independently storable shards of a stripe.
///
/// Out-of-range values are representable so that callers can hand them in;
/// the orchestrators reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShardId(pub u8);

/// Role of a shard within the stripe layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardRole {
    /// Contiguous slice of the stripe once reconstructed
    Data,
    /// Only derivable through the full transform
    Coding,
}

impl ShardId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }

    /// Position of this shard in `[0, n)` arrays
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn is_valid(&self) -> bool {
        self.index() < TOTAL_SHARDS
    }

    /// Fail with `InvalidShardId` unless the id lies in `[0, n)`
    pub fn validate(&self) -> Result<Self> {
        if self.is_valid() {
            Ok(*self)
        } else {
            Err(StripeGateError::InvalidShardId {
                id: self.0 as i64,
                max: TOTAL_SHARDS - 1,
            })
        }
    }

    pub fn role(&self) -> ShardRole {
        if self.index() < DATA_SHARDS {
            ShardRole::Data
        } else {
            ShardRole::Coding
        }
    }

    pub fn is_data(&self) -> bool {
        self.role() == ShardRole::Data
    }
}

impl From<u8> for ShardId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of unique shard ids, iterated in ascending order
pub type ShardSet = BTreeSet<ShardId>;

/// Per-shard values keyed by shard id
pub type ShardMap<T> = BTreeMap<ShardId, T>;

/// The complete set `{0..n-1}`
pub fn full_shard_set() -> ShardSet {
    (0..TOTAL_SHARDS as u8).map(ShardId).collect()
}

/// Build a shard set from raw ids
pub fn shard_set<I: IntoIterator<Item = u8>>(ids: I) -> ShardSet {
    ids.into_iter().map(ShardId).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_roles() {
        for id in 0..TOTAL_SHARDS as u8 {
            let shard = ShardId(id);
            assert!(shard.is_valid());
            assert_eq!(shard.is_data(), (id as usize) < DATA_SHARDS);
        }
        assert_eq!(ShardId(3).role(), ShardRole::Data);
        assert_eq!(ShardId(4).role(), ShardRole::Coding);
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(ShardId(8).validate().is_ok());
        let err = ShardId(9).validate().unwrap_err();
        assert!(matches!(err, StripeGateError::InvalidShardId { id: 9, max: 8 }));
    }

    #[test]
    fn test_full_shard_set() {
        let full = full_shard_set();
        assert_eq!(full.len(), TOTAL_SHARDS);
        assert_eq!(full.iter().next(), Some(&ShardId(0)));
        assert_eq!(full.iter().last(), Some(&ShardId(8)));
    }
}
