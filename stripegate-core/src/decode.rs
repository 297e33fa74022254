//! Decode orchestration
//!
//! The transform restores the whole stripe at once. Data-role shards are then
//! cut out of the recovered buffer with the same arithmetic encode uses.
//! Coding-role shards cannot be isolated from a restore; they are left out of
//! the result so the caller re-derives them through a full encode.

use crate::alignment;
use crate::codec::StripeCodec;
use crate::error::{Result, StripeGateError};
use crate::shard::{ShardMap, ShardSet};
use bytes::Bytes;
use tracing::{debug, warn};

impl StripeCodec {
    /// Decode the shards of `want` from the chunks in `available`.
    ///
    /// The returned map may be a strict subset of `want`: a requested
    /// coding-role shard never gets an entry. A `declared_chunk_size` of
    /// zero means "infer from the chunks".
    pub fn decode(
        &self,
        want: &ShardSet,
        available: &ShardMap<Bytes>,
        declared_chunk_size: usize,
    ) -> Result<ShardMap<Bytes>> {
        debug!(?want, declared_chunk_size, "Decoding");
        let profile = *self.profile();

        let present: ShardSet = available.keys().copied().collect();
        self.gate().check(&present)?;

        let chunk_size = self.resolve_chunk_size(available, declared_chunk_size)?;

        let mut input: Vec<Option<&[u8]>> = vec![None; profile.n];
        for (shard, chunk) in available {
            shard.validate()?;
            if chunk.len() != chunk_size {
                return Err(StripeGateError::ShardSizeMismatch {
                    shard: shard.0,
                    expected: chunk_size,
                    actual: chunk.len(),
                });
            }
            input[shard.index()] = Some(chunk.as_ref());
        }

        if !self.provider().can_restore(&input) {
            warn!(?present, "Codec reports this shard combination cannot be restored");
            return Err(StripeGateError::Unreconstructible(format!(
                "codec cannot restore from shards {:?}",
                present
            )));
        }

        let original_size = alignment::original_size_for(&profile, chunk_size);
        let mut restored = vec![0u8; original_size];
        if let Err(status) = self.provider().restore(&mut restored, &input) {
            warn!(%status, "Codec restore failed");
            return Err(StripeGateError::Unreconstructible(format!(
                "restore failed: {}",
                status
            )));
        }
        let restored = Bytes::from(restored);

        let per_chunk = alignment::chunk_size_for(&profile, original_size);
        let mut decoded = ShardMap::new();
        for &shard in want {
            shard.validate()?;

            if !shard.is_data() {
                debug!(
                    shard = shard.0,
                    "Coding shard left to encode fallback"
                );
                continue;
            }

            let offset = shard.index() * per_chunk;
            let len = if shard.index() == profile.k - 1 {
                original_size - offset
            } else {
                per_chunk
            };
            debug!(shard = shard.0, offset, len, "Returning data shard");
            decoded.insert(shard, restored.slice(offset..offset + len));
        }

        Ok(decoded)
    }
}
