//! Stripe codec
//!
//! Ties the fixed profile, the availability gate and a leased codec provider
//! together. Encode and decode live in [`crate::encode`] and
//! [`crate::decode`]; this module holds construction, the static layout
//! queries, read planning and the operations the transform cannot offer.

use crate::alignment;
use crate::error::{Result, StripeGateError};
use crate::flags::PluginFlags;
use crate::gate::AvailabilityGate;
use crate::profile::{Profile, ProfileParams};
use crate::provider::{CodecProvider, ProviderLease, SharedProvider};
use crate::selector::select_minimum_set;
use crate::shard::{ShardId, ShardMap, ShardSet};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

/// Availability-gated codec for one fixed (k, m) profile
pub struct StripeCodec {
    params: ProfileParams,
    profile: Profile,
    gate: AvailabilityGate,
    chunk_mapping: Vec<ShardId>,
    lease: ProviderLease,
}

impl StripeCodec {
    /// Validate `params` and take a lease on the shared provider
    pub fn new(params: ProfileParams, provider: &Arc<SharedProvider>) -> Result<Self> {
        debug!(?params, "Initializing stripe codec");
        let profile = Profile::from_params(&params)?;
        let lease = provider.acquire()?;

        info!(
            k = profile.k,
            m = profile.m,
            n = profile.n,
            min_shards = profile.min_shards_for_decode,
            "Stripe codec ready"
        );

        Ok(Self {
            params,
            gate: AvailabilityGate::new(&profile),
            chunk_mapping: (0..profile.n as u8).map(ShardId).collect(),
            profile,
            lease,
        })
    }

    /// The parameters this codec was created with
    pub fn params(&self) -> &ProfileParams {
        &self.params
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn gate(&self) -> &AvailabilityGate {
        &self.gate
    }

    pub(crate) fn provider(&self) -> &dyn CodecProvider {
        self.lease.provider()
    }

    pub fn chunk_count(&self) -> usize {
        self.profile.n
    }

    pub fn data_chunk_count(&self) -> usize {
        self.profile.k
    }

    pub fn coding_chunk_count(&self) -> usize {
        self.profile.m
    }

    /// Chunks are never subdivided
    pub fn sub_chunk_count(&self) -> usize {
        1
    }

    pub fn minimum_granularity(&self) -> usize {
        self.profile.base_alignment
    }

    /// Identity mapping of shard positions
    pub fn chunk_mapping(&self) -> &[ShardId] {
        &self.chunk_mapping
    }

    pub fn chunk_size_for(&self, stripe_width: usize) -> usize {
        alignment::chunk_size_for(&self.profile, stripe_width)
    }

    pub fn supported_optimizations(&self) -> PluginFlags {
        PluginFlags::supported()
    }

    /// Shards to read in order to decode `want`
    pub fn minimum_to_decode(&self, want: &ShardSet, available: &ShardSet) -> Result<ShardSet> {
        select_minimum_set(&self.gate, want, available)
    }

    /// Same as [`Self::minimum_to_decode`]; read costs do not influence the choice
    pub fn minimum_to_decode_with_cost(
        &self,
        want: &ShardSet,
        available: &ShardMap<u32>,
    ) -> Result<ShardSet> {
        let available: ShardSet = available.keys().copied().collect();
        self.minimum_to_decode(want, &available)
    }

    /// Decode and concatenate `want` in the given order.
    ///
    /// Shards the decode step leaves out (coding-role shards) are replaced by
    /// zeroes of the effective chunk size so positions stay stable.
    pub fn decode_concat(
        &self,
        want: &[ShardId],
        chunks: &ShardMap<Bytes>,
        declared_chunk_size: usize,
    ) -> Result<Bytes> {
        let want_set: ShardSet = want.iter().copied().collect();
        let decoded = self.decode(&want_set, chunks, declared_chunk_size)?;
        let chunk_size = self.resolve_chunk_size(chunks, declared_chunk_size)?;

        let mut out = Vec::with_capacity(want.len() * chunk_size);
        for shard in want {
            match decoded.get(shard) {
                Some(chunk) => out.extend_from_slice(chunk),
                None => {
                    debug!(
                        shard = shard.0,
                        chunk_size, "Shard not decoded, appending zeroes"
                    );
                    out.resize(out.len() + chunk_size, 0);
                }
            }
        }

        debug!(len = out.len(), "Concatenated decode complete");
        Ok(Bytes::from(out))
    }

    /// Decode the data-role shards in order, chunk size taken from `chunks`
    pub fn decode_concat_data(&self, chunks: &ShardMap<Bytes>) -> Result<Bytes> {
        let want: Vec<ShardId> = (0..self.profile.k as u8).map(ShardId).collect();
        self.decode_concat(&want, chunks, 0)
    }

    /// Declared chunk size if positive, else the length of any present chunk
    pub(crate) fn resolve_chunk_size(
        &self,
        chunks: &ShardMap<Bytes>,
        declared_chunk_size: usize,
    ) -> Result<usize> {
        let chunk_size = if declared_chunk_size > 0 {
            declared_chunk_size
        } else {
            chunks.values().next().map(Bytes::len).unwrap_or(0)
        };

        if chunk_size == 0 {
            return Err(StripeGateError::InvalidArgument(
                "chunk size is zero or cannot be resolved".to_string(),
            ));
        }
        if chunk_size % self.profile.base_alignment != 0 {
            return Err(StripeGateError::InvalidArgument(format!(
                "chunk size {} is not a multiple of {}",
                chunk_size, self.profile.base_alignment
            )));
        }
        Ok(chunk_size)
    }

    // ===== Operations the transform cannot provide =====

    pub fn encode_chunks(&self, _input: &ShardMap<Bytes>) -> Result<ShardMap<Bytes>> {
        Err(StripeGateError::Unsupported("encode_chunks"))
    }

    pub fn decode_chunks(
        &self,
        _want: &ShardSet,
        _input: &ShardMap<Bytes>,
    ) -> Result<ShardMap<Bytes>> {
        Err(StripeGateError::Unsupported("decode_chunks"))
    }

    pub fn encode_delta(&self, _old_data: &[u8], _new_data: &[u8]) -> Result<Bytes> {
        Err(StripeGateError::Unsupported("encode_delta"))
    }

    pub fn apply_delta(
        &self,
        _delta: &ShardMap<Bytes>,
        _parity: &mut ShardMap<Bytes>,
    ) -> Result<()> {
        Err(StripeGateError::Unsupported("apply_delta"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reed_solomon::ReedSolomonProvider;
    use crate::shard::shard_set;

    fn codec() -> StripeCodec {
        let shared = SharedProvider::from_provider(ReedSolomonProvider::new().unwrap());
        StripeCodec::new(ProfileParams::fixed(), &shared).unwrap()
    }

    #[test]
    fn test_layout_queries() {
        let codec = codec();
        assert_eq!(codec.chunk_count(), 9);
        assert_eq!(codec.data_chunk_count(), 4);
        assert_eq!(codec.coding_chunk_count(), 5);
        assert_eq!(codec.sub_chunk_count(), 1);
        assert_eq!(codec.minimum_granularity(), 4);
        assert_eq!(codec.chunk_mapping().len(), 9);
        assert!(codec
            .chunk_mapping()
            .iter()
            .enumerate()
            .all(|(i, s)| s.index() == i));
        assert_eq!(codec.chunk_size_for(10), 4);
    }

    #[test]
    fn test_new_rejects_bad_profile_before_loading() {
        let shared = SharedProvider::from_provider(ReedSolomonProvider::new().unwrap());
        let params = ProfileParams::new().with("k", "8").with("m", "3");
        let err = StripeCodec::new(params, &shared).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert!(!shared.is_loaded());
    }

    #[test]
    fn test_codec_holds_a_lease() {
        let shared = SharedProvider::from_provider(ReedSolomonProvider::new().unwrap());
        let a = StripeCodec::new(ProfileParams::fixed(), &shared).unwrap();
        let b = StripeCodec::new(ProfileParams::fixed(), &shared).unwrap();
        assert_eq!(shared.ref_count(), 2);
        drop(a);
        drop(b);
        assert!(!shared.is_loaded());
    }

    #[test]
    fn test_params_are_retained() {
        let shared = SharedProvider::from_provider(ReedSolomonProvider::new().unwrap());
        let params = ProfileParams::fixed().with("crush-failure-domain", "host");
        let codec = StripeCodec::new(params.clone(), &shared).unwrap();
        assert_eq!(codec.params(), &params);
    }

    #[test]
    fn test_minimum_to_decode_with_cost_ignores_cost() {
        let codec = codec();
        let mut available = ShardMap::new();
        for id in [8u8, 7, 6, 5, 4, 3, 2] {
            available.insert(ShardId(id), 1000 - id as u32);
        }
        let minimum = codec
            .minimum_to_decode_with_cost(&shard_set([8]), &available)
            .unwrap();
        assert_eq!(minimum, shard_set(2..8));
    }

    #[test]
    fn test_unsupported_operations() {
        let codec = codec();
        let empty = ShardMap::new();
        let mut parity = ShardMap::new();

        assert_eq!(
            codec.encode_chunks(&empty).unwrap_err().kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            codec.decode_chunks(&ShardSet::new(), &empty).unwrap_err().kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            codec.encode_delta(b"old", b"new").unwrap_err().kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            codec.apply_delta(&empty, &mut parity).unwrap_err().kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn test_resolve_chunk_size() {
        let codec = codec();
        let mut chunks = ShardMap::new();
        assert!(codec.resolve_chunk_size(&chunks, 0).is_err());
        assert_eq!(codec.resolve_chunk_size(&chunks, 8).unwrap(), 8);
        assert!(codec.resolve_chunk_size(&chunks, 6).is_err());

        chunks.insert(ShardId(3), Bytes::from_static(&[0u8; 12]));
        assert_eq!(codec.resolve_chunk_size(&chunks, 0).unwrap(), 12);
    }
}
