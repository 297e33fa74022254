//! Minimum read set selection
//!
//! Picks exactly `min_shards_for_decode` shards out of the available set in
//! ascending id order. The tie-break is fixed and deterministic; it does not
//! prefer data-role shards and does not look at what the caller wants to
//! read. Reads are always whole chunks.

use crate::error::Result;
use crate::gate::AvailabilityGate;
use crate::shard::ShardSet;
use tracing::debug;

/// Select the shards to read for a decode of `want` from `available`.
///
/// Re-validates the gate; fails with `InsufficientShards` when it rejects.
pub fn select_minimum_set(
    gate: &AvailabilityGate,
    want: &ShardSet,
    available: &ShardSet,
) -> Result<ShardSet> {
    debug!(?want, ?available, "Selecting minimum read set");
    gate.check(available)?;

    let minimum: ShardSet = available.iter().take(gate.required()).copied().collect();

    debug!(?minimum, "Minimum read set selected");
    Ok(minimum)
}
