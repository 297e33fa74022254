//! Encode orchestration
//!
//! The transform has no partial-encode mode: every call produces all `n`
//! chunks from a full stripe.

use crate::alignment;
use crate::codec::StripeCodec;
use crate::error::{Result, StripeGateError};
use crate::shard::{full_shard_set, ShardId, ShardMap, ShardSet};
use bytes::Bytes;
use tracing::{debug, error};

impl StripeCodec {
    /// Encode `stripe` into one chunk per shard of `want`.
    ///
    /// `want` must be the full shard set. An empty stripe yields empty chunks
    /// without calling the provider; otherwise the stripe length must be a
    /// multiple of the base alignment.
    pub fn encode(&self, want: &ShardSet, stripe: &[u8]) -> Result<ShardMap<Bytes>> {
        debug!(?want, len = stripe.len(), "Encoding stripe");
        let profile = *self.profile();

        for shard in want {
            shard.validate()?;
        }
        if *want != full_shard_set() {
            return Err(StripeGateError::InvalidArgument(format!(
                "encode needs all {} shards, got {}",
                profile.n,
                want.len()
            )));
        }

        if stripe.is_empty() {
            return Ok(want.iter().map(|&shard| (shard, Bytes::new())).collect());
        }

        if stripe.len() % profile.base_alignment != 0 {
            return Err(StripeGateError::InvalidArgument(format!(
                "stripe length {} is not a multiple of {}",
                stripe.len(),
                profile.base_alignment
            )));
        }

        let chunk_size = alignment::chunk_size_for(&profile, stripe.len());

        // Provider writes into these in place
        let mut shards: Vec<Vec<u8>> = vec![vec![0u8; chunk_size]; profile.n];
        let buffers: Vec<*const u8> = shards.iter().map(|s| s.as_ptr()).collect();

        // Contiguous input, zero-padded to k × chunk_size
        let mut input = Vec::with_capacity(chunk_size * profile.k);
        input.extend_from_slice(stripe);
        input.resize(chunk_size * profile.k, 0);

        self.provider().split(&input, &mut shards);

        for (i, (shard, &buffer)) in shards.iter().zip(&buffers).enumerate() {
            if shard.as_ptr() != buffer || shard.len() != chunk_size {
                error!(
                    shard = i,
                    expected = chunk_size,
                    actual = shard.len(),
                    "Codec provider replaced an output buffer"
                );
                panic!("codec provider did not write shard {} in place", i);
            }
        }

        debug!(chunk_size, "Stripe encoded");
        Ok(shards
            .into_iter()
            .enumerate()
            .map(|(i, shard)| (ShardId(i as u8), Bytes::from(shard)))
            .filter(|(shard, _)| want.contains(shard))
            .collect())
    }
}
