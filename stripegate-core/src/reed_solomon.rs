//! Reed-Solomon reference codec provider
//!
//! Implements the provider contract for k=4, m=5 on top of
//! `reed-solomon-erasure`:
//! - split lays the input out as 4 data shards and fills 5 parity shards
//! - restore rebuilds missing data shards and concatenates them
//! - can_restore holds when at least 4 equally sized shards are present

use crate::error::Result;
use crate::provider::{CodecProvider, CodecStatus};
use crate::{CODING_SHARDS, DATA_SHARDS, TOTAL_SHARDS};
use reed_solomon_erasure::galois_8::ReedSolomon;
use tracing::error;

/// Restore input did not have one slot per shard
pub const STATUS_BAD_SHAPE: i32 = -1;
/// The Reed-Solomon reconstruction failed
pub const STATUS_RECONSTRUCT_FAILED: i32 = -2;
/// Output length is not k × chunk size
pub const STATUS_BAD_OUTPUT_LEN: i32 = -3;

/// Reed-Solomon backed provider
pub struct ReedSolomonProvider {
    encoder: ReedSolomon,
}

impl ReedSolomonProvider {
    pub fn new() -> Result<Self> {
        let encoder = ReedSolomon::new(DATA_SHARDS, CODING_SHARDS)?;
        Ok(Self { encoder })
    }

    fn present_len(input: &[Option<&[u8]>]) -> Option<usize> {
        input.iter().flatten().map(|s| s.len()).next()
    }
}

impl CodecProvider for ReedSolomonProvider {
    fn split(&self, input: &[u8], out: &mut [Vec<u8>]) {
        let shard_size = input.len() / DATA_SHARDS;
        // Encode hands over k × chunk_size bytes and n buffers of chunk_size,
        // so every shard has the same length and `encode` cannot fail.
        debug_assert_eq!(input.len() % DATA_SHARDS, 0);
        debug_assert!(out.len() == TOTAL_SHARDS && out.iter().all(|s| s.len() == shard_size));

        for (shard, data) in out.iter_mut().zip(input.chunks(shard_size.max(1))) {
            shard.copy_from_slice(data);
        }

        // Fills in the parity shards
        if let Err(e) = self.encoder.encode(out) {
            error!(error = %e, "Reed-Solomon split failed");
        }
    }

    fn restore(
        &self,
        out: &mut [u8],
        input: &[Option<&[u8]>],
    ) -> std::result::Result<(), CodecStatus> {
        if input.len() != TOTAL_SHARDS {
            return Err(CodecStatus(STATUS_BAD_SHAPE));
        }
        let shard_size = Self::present_len(input).ok_or(CodecStatus(STATUS_BAD_SHAPE))?;
        if out.len() != shard_size * DATA_SHARDS {
            return Err(CodecStatus(STATUS_BAD_OUTPUT_LEN));
        }

        let mut shards: Vec<Option<Vec<u8>>> =
            input.iter().map(|opt| opt.map(|s| s.to_vec())).collect();

        self.encoder.reconstruct_data(&mut shards).map_err(|e| {
            error!(error = %e, "Reed-Solomon restore failed");
            CodecStatus(STATUS_RECONSTRUCT_FAILED)
        })?;

        for (dst, shard) in out.chunks_mut(shard_size).zip(shards.iter().take(DATA_SHARDS)) {
            match shard {
                Some(shard) => dst.copy_from_slice(shard),
                None => return Err(CodecStatus(STATUS_RECONSTRUCT_FAILED)),
            }
        }
        Ok(())
    }

    fn can_restore(&self, input: &[Option<&[u8]>]) -> bool {
        if input.len() != TOTAL_SHARDS {
            return false;
        }
        let Some(shard_size) = Self::present_len(input) else {
            return false;
        };
        let present = input.iter().flatten().count();
        shard_size > 0
            && present >= DATA_SHARDS
            && input.iter().flatten().all(|s| s.len() == shard_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_all(provider: &ReedSolomonProvider, input: &[u8]) -> Vec<Vec<u8>> {
        let mut out = vec![vec![0u8; input.len() / DATA_SHARDS]; TOTAL_SHARDS];
        provider.split(input, &mut out);
        out
    }

    #[test]
    fn test_split_lays_out_data_shards() {
        let provider = ReedSolomonProvider::new().unwrap();
        let input: Vec<u8> = (0..32).collect();
        let out = split_all(&provider, &input);

        assert_eq!(out.len(), 9);
        for (i, shard) in out.iter().take(DATA_SHARDS).enumerate() {
            assert_eq!(shard.as_slice(), &input[i * 8..(i + 1) * 8]);
        }
        assert!(out[DATA_SHARDS..].iter().any(|s| s.iter().any(|&b| b != 0)));
    }

    #[test]
    fn test_restore_with_missing_data_shards() {
        let provider = ReedSolomonProvider::new().unwrap();
        let input: Vec<u8> = (0..64).map(|i| (i * 7) as u8).collect();
        let out = split_all(&provider, &input);

        let mut sparse: Vec<Option<&[u8]>> = out.iter().map(|s| Some(s.as_slice())).collect();
        sparse[0] = None;
        sparse[2] = None;
        sparse[7] = None;
        assert!(provider.can_restore(&sparse));

        let mut restored = vec![0u8; input.len()];
        provider.restore(&mut restored, &sparse).unwrap();
        assert_eq!(restored, input);
    }

    #[test]
    fn test_can_restore_rejects_bad_input() {
        let provider = ReedSolomonProvider::new().unwrap();
        let shard = [1u8, 2, 3, 4];
        let short = [1u8, 2];

        let three: Vec<Option<&[u8]>> = (0..TOTAL_SHARDS)
            .map(|i| if i < 3 { Some(&shard[..]) } else { None })
            .collect();
        assert!(!provider.can_restore(&three));

        let mut uneven: Vec<Option<&[u8]>> = vec![Some(&shard[..]); TOTAL_SHARDS];
        uneven[5] = Some(&short[..]);
        assert!(!provider.can_restore(&uneven));

        assert!(!provider.can_restore(&[Some(&shard[..])]));
    }

    #[test]
    fn test_restore_rejects_wrong_output_len() {
        let provider = ReedSolomonProvider::new().unwrap();
        let input = vec![9u8; 16];
        let out = split_all(&provider, &input);
        let sparse: Vec<Option<&[u8]>> = out.iter().map(|s| Some(s.as_slice())).collect();

        let mut restored = vec![0u8; 15];
        assert_eq!(
            provider.restore(&mut restored, &sparse),
            Err(CodecStatus(STATUS_BAD_OUTPUT_LEN))
        );
    }
}
