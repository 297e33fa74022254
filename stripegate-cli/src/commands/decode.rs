//! Decode Command
//!
//! Rebuilds the original file from whichever shard files are present.

use crate::commands::data_shards;
use crate::layout::ShardDir;
use crate::symbols;
use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;
use stripegate_core::StripeCodec;
use tracing::info;

/// Decode configuration
pub struct DecodeConfig {
    pub output: PathBuf,
}

/// Run decode command
pub fn run(codec: &StripeCodec, layout: &ShardDir, config: DecodeConfig) -> Result<()> {
    let manifest = layout.read_manifest()?;

    let data = if manifest.file_len == 0 {
        Vec::new()
    } else {
        let shards = layout.read_shards()?;
        info!(present = shards.len(), "Decoding from shard files");

        let stripe = codec
            .decode_concat(&data_shards(codec), &shards, manifest.chunk_size)
            .with_context(|| format!("Decode failed with {} shards present", shards.len()))?;
        let mut data = stripe.to_vec();
        data.truncate(manifest.file_len as usize);
        data
    };

    std::fs::write(&config.output, &data)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    println!(
        "{} Decoded {} bytes to {}",
        style(symbols::CHECK).green(),
        data.len(),
        config.output.display()
    );
    Ok(())
}
