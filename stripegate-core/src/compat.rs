//! Integer-keyed adaptor
//!
//! Older storage callers hand over plain `i32` shard ids. These helpers
//! translate such collections into [`ShardSet`]/[`ShardMap`] and forward to
//! the single canonical operation on [`StripeCodec`].

use crate::codec::StripeCodec;
use crate::error::{Result, StripeGateError};
use crate::shard::{ShardId, ShardMap, ShardSet};
use crate::TOTAL_SHARDS;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// Sub-chunk ranges to read per shard, as `(first, count)` pairs
pub type ReadRanges = BTreeMap<i32, Vec<(usize, usize)>>;

pub fn shard_id_from_int(id: i32) -> Result<ShardId> {
    u8::try_from(id)
        .map(ShardId)
        .ok()
        .filter(ShardId::is_valid)
        .ok_or(StripeGateError::InvalidShardId {
            id: id as i64,
            max: TOTAL_SHARDS - 1,
        })
}

pub fn shard_set_from_ints(ids: &BTreeSet<i32>) -> Result<ShardSet> {
    ids.iter().map(|&id| shard_id_from_int(id)).collect()
}

pub fn shard_map_from_ints<T: Clone>(map: &BTreeMap<i32, T>) -> Result<ShardMap<T>> {
    map.iter()
        .map(|(&id, value)| Ok((shard_id_from_int(id)?, value.clone())))
        .collect()
}

pub fn shard_map_to_ints<T>(map: ShardMap<T>) -> BTreeMap<i32, T> {
    map.into_iter()
        .map(|(shard, value)| (shard.0 as i32, value))
        .collect()
}

pub fn encode(
    codec: &StripeCodec,
    want: &BTreeSet<i32>,
    stripe: &[u8],
) -> Result<BTreeMap<i32, Bytes>> {
    let want = shard_set_from_ints(want)?;
    codec.encode(&want, stripe).map(shard_map_to_ints)
}

pub fn decode(
    codec: &StripeCodec,
    want: &BTreeSet<i32>,
    chunks: &BTreeMap<i32, Bytes>,
    chunk_size: usize,
) -> Result<BTreeMap<i32, Bytes>> {
    let want = shard_set_from_ints(want)?;
    let chunks = shard_map_from_ints(chunks)?;
    codec.decode(&want, &chunks, chunk_size).map(shard_map_to_ints)
}

/// Minimum read set with whole-chunk ranges `[(0, sub_chunk_count)]`
pub fn minimum_to_decode_ranges(
    codec: &StripeCodec,
    want: &BTreeSet<i32>,
    available: &BTreeSet<i32>,
) -> Result<ReadRanges> {
    let want = shard_set_from_ints(want)?;
    let available = shard_set_from_ints(available)?;
    let minimum = codec.minimum_to_decode(&want, &available)?;

    Ok(minimum
        .into_iter()
        .map(|shard| (shard.0 as i32, vec![(0, codec.sub_chunk_count())]))
        .collect())
}

pub fn minimum_to_decode_with_cost(
    codec: &StripeCodec,
    want: &BTreeSet<i32>,
    available: &BTreeMap<i32, u32>,
) -> Result<BTreeSet<i32>> {
    let want = shard_set_from_ints(want)?;
    let available = shard_map_from_ints(available)?;
    let minimum = codec.minimum_to_decode_with_cost(&want, &available)?;
    Ok(minimum.into_iter().map(|shard| shard.0 as i32).collect())
}

/// Concatenated decode in ascending id order of `want`, chunk size taken
/// from the chunks themselves
pub fn decode_concat(
    codec: &StripeCodec,
    want: &BTreeSet<i32>,
    chunks: &BTreeMap<i32, Bytes>,
) -> Result<Bytes> {
    let want: Vec<ShardId> = shard_set_from_ints(want)?.into_iter().collect();
    let chunks = shard_map_from_ints(chunks)?;
    codec.decode_concat(&want, &chunks, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::profile::ProfileParams;
    use crate::provider::SharedProvider;
    use crate::reed_solomon::ReedSolomonProvider;

    fn codec() -> StripeCodec {
        let shared = SharedProvider::from_provider(ReedSolomonProvider::new().unwrap());
        StripeCodec::new(ProfileParams::fixed(), &shared).unwrap()
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(shard_id_from_int(0).unwrap(), ShardId(0));
        assert_eq!(shard_id_from_int(8).unwrap(), ShardId(8));
        for bad in [-1, 9, 300] {
            let err = shard_id_from_int(bad).unwrap_err();
            assert!(matches!(err, StripeGateError::InvalidShardId { id, .. } if id == bad as i64));
        }
    }

    #[test]
    fn test_minimum_ranges_are_whole_chunks() {
        let codec = codec();
        let ranges = minimum_to_decode_ranges(
            &codec,
            &BTreeSet::from([0]),
            &(0..7).collect::<BTreeSet<i32>>(),
        )
        .unwrap();

        assert_eq!(ranges.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert!(ranges.values().all(|r| r == &vec![(0, 1)]));
    }

    #[test]
    fn test_round_trip_through_ints() {
        let codec = codec();
        let stripe: Vec<u8> = (0..32).collect();
        let all: BTreeSet<i32> = (0..9).collect();

        let encoded = encode(&codec, &all, &stripe).unwrap();
        assert_eq!(encoded.len(), 9);

        let mut chunks = encoded.clone();
        chunks.remove(&0);
        chunks.remove(&7);
        chunks.remove(&8);

        let decoded = decode(&codec, &BTreeSet::from([0, 1]), &chunks, 8).unwrap();
        assert_eq!(&decoded[&0][..], &stripe[0..8]);
        assert_eq!(&decoded[&1][..], &stripe[8..16]);

        let data = decode_concat(&codec, &(0..4).collect(), &chunks).unwrap();
        assert_eq!(&data[..], &stripe[..]);
    }

    #[test]
    fn test_with_cost_forwards() {
        let codec = codec();
        let available: BTreeMap<i32, u32> = (1..9).map(|id| (id, 1)).collect();
        let minimum = minimum_to_decode_with_cost(&codec, &BTreeSet::from([0]), &available).unwrap();
        assert_eq!(minimum, (1..7).collect::<BTreeSet<i32>>());

        let err = minimum_to_decode_with_cost(&codec, &BTreeSet::from([0]), &BTreeMap::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientShards);
    }
}
