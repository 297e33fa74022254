//! Repair Command
//!
//! Recreates missing shard files. Missing data-role shards come straight
//! from the decode; missing coding-role shards are not produced by decode
//! and are re-derived by a full encode of the recovered stripe.

use crate::commands::data_shards;
use crate::layout::ShardDir;
use crate::symbols;
use anyhow::{Context, Result};
use bytes::Bytes;
use console::style;
use stripegate_core::{full_shard_set, ShardMap, ShardSet, StripeCodec};
use tracing::{debug, info};

/// Run repair command, returning the set of shards that were rewritten
pub fn run(codec: &StripeCodec, layout: &ShardDir) -> Result<ShardSet> {
    let manifest = layout.read_manifest()?;
    let shards = layout.read_shards()?;

    let present: ShardSet = shards.keys().copied().collect();
    let missing: ShardSet = full_shard_set().difference(&present).copied().collect();

    if missing.is_empty() {
        println!("{} All {} shards present", style(symbols::CHECK).green(), present.len());
        return Ok(missing);
    }
    info!(?missing, "Repairing shards");

    let repaired = if manifest.chunk_size == 0 {
        missing.iter().map(|&shard| (shard, Bytes::new())).collect()
    } else {
        rebuild(codec, &shards, &missing, manifest.chunk_size)?
    };

    layout.write_shards(&repaired)?;

    for shard in &missing {
        println!("  {} shard {}", style(symbols::CHECK).green(), shard);
    }
    println!(
        "{} Repaired {} of {} shards",
        style(symbols::CHECK).green(),
        repaired.len(),
        codec.chunk_count()
    );
    Ok(missing)
}

fn rebuild(
    codec: &StripeCodec,
    shards: &ShardMap<Bytes>,
    missing: &ShardSet,
    chunk_size: usize,
) -> Result<ShardMap<Bytes>> {
    let mut repaired = codec
        .decode(missing, shards, chunk_size)
        .context("Decode failed")?;

    let deferred: ShardSet = missing
        .iter()
        .filter(|shard| !repaired.contains_key(shard))
        .copied()
        .collect();

    if !deferred.is_empty() {
        debug!(?deferred, "Re-deriving shards through full encode");
        let stripe = codec
            .decode_concat(&data_shards(codec), shards, chunk_size)
            .context("Decode of data shards failed")?;
        let mut encoded = codec
            .encode(&full_shard_set(), &stripe)
            .context("Re-encode failed")?;

        for shard in deferred {
            if let Some(chunk) = encoded.remove(&shard) {
                repaired.insert(shard, chunk);
            }
        }
    }

    Ok(repaired)
}
