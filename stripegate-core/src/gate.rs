//! Availability gate
//!
//! Reconstruction is only attempted when enough shards are present to stay
//! inside the transform's proven-reliable region. The check is on
//! cardinality alone: every combination of at least `min_shards_for_decode`
//! shards is accepted.

use crate::error::{Result, StripeGateError};
use crate::profile::Profile;
use crate::shard::ShardSet;
use tracing::warn;

/// Cardinality gate in front of every decode
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityGate {
    min_shards: usize,
    data_shards: usize,
}

impl AvailabilityGate {
    pub fn new(profile: &Profile) -> Self {
        Self {
            min_shards: profile.min_shards_for_decode,
            data_shards: profile.k,
        }
    }

    /// Minimum number of available shards the gate accepts
    pub fn required(&self) -> usize {
        self.min_shards
    }

    pub fn is_reconstruction_permitted(&self, available: &ShardSet) -> bool {
        available.len() >= self.min_shards && available.len() >= self.data_shards
    }

    /// Fail with `InsufficientShards` unless reconstruction is permitted
    pub fn check(&self, available: &ShardSet) -> Result<()> {
        if self.is_reconstruction_permitted(available) {
            return Ok(());
        }
        warn!(
            available = available.len(),
            required = self.min_shards,
            "Decode rejected: available shards below reliable minimum"
        );
        Err(StripeGateError::InsufficientShards {
            available: available.len(),
            required: self.min_shards,
        })
    }
}

impl Default for AvailabilityGate {
    fn default() -> Self {
        Self::new(&Profile::FIXED)
    }
}
