//! Encode Command
//!
//! Splits a file into one shard file per shard plus a manifest.

use crate::layout::{Manifest, ShardDir};
use crate::symbols;
use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;
use stripegate_core::{alignment, full_shard_set, StripeCodec};
use tracing::info;

/// Encode configuration
pub struct EncodeConfig {
    pub input: PathBuf,
}

/// Run encode command
pub fn run(codec: &StripeCodec, layout: &ShardDir, config: EncodeConfig) -> Result<()> {
    let data = std::fs::read(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;
    let file_len = data.len();

    // Encode needs an aligned stripe; pad with zeroes and remember the length
    let mut stripe = data;
    stripe.resize(alignment::aligned_size(codec.profile(), file_len), 0);

    let shards = codec
        .encode(&full_shard_set(), &stripe)
        .context("Encode failed")?;
    let chunk_size = shards.values().next().map(|c| c.len()).unwrap_or(0);

    layout.write_shards(&shards)?;
    layout.write_manifest(&Manifest {
        file_len: file_len as u64,
        stripe_len: stripe.len(),
        chunk_size,
    })?;

    info!(file_len, chunk_size, dir = %layout.root().display(), "File encoded");
    println!(
        "{} Encoded {} bytes into {} shards of {} bytes in {}",
        style(symbols::CHECK).green(),
        file_len,
        shards.len(),
        chunk_size,
        layout.root().display()
    );
    Ok(())
}
