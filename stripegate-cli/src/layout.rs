//! On-disk shard directory
//!
//! One file per shard (`<prefix>.<id>`) plus a JSON manifest. The manifest
//! carries the true file length, which the shards alone cannot recover once
//! the stripe was padded for encoding.

use crate::config::OutputSettings;
use anyhow::{Context, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stripegate_core::{ShardId, ShardMap, TOTAL_SHARDS};

/// Stripe metadata written next to the shards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Length of the original file in bytes
    pub file_len: u64,
    /// Length of the padded stripe that was encoded
    pub stripe_len: usize,
    /// Per-shard chunk size
    pub chunk_size: usize,
}

pub struct ShardDir {
    root: PathBuf,
    output: OutputSettings,
}

impl ShardDir {
    pub fn new(root: impl Into<PathBuf>, output: OutputSettings) -> Self {
        Self {
            root: root.into(),
            output,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shard_path(&self, shard: ShardId) -> PathBuf {
        self.root
            .join(format!("{}.{}", self.output.shard_prefix, shard.0))
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.output.manifest_name)
    }

    pub fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        let content = serde_json::to_string_pretty(manifest)?;
        fs::write(self.manifest_path(), content).context("Failed to write manifest")?;
        Ok(())
    }

    pub fn read_manifest(&self) -> Result<Manifest> {
        let path = self.manifest_path();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse manifest")
    }

    pub fn write_shards(&self, shards: &ShardMap<Bytes>) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        for (&shard, chunk) in shards {
            let path = self.shard_path(shard);
            fs::write(&path, chunk)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }

    /// Read every shard file that exists; missing files are simply absent
    pub fn read_shards(&self) -> Result<ShardMap<Bytes>> {
        let mut shards = ShardMap::new();
        for id in 0..TOTAL_SHARDS as u8 {
            let shard = ShardId(id);
            let path = self.shard_path(shard);
            if !path.exists() {
                continue;
            }
            let data =
                fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            shards.insert(shard, Bytes::from(data));
        }
        Ok(shards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ShardDir::new(dir.path(), OutputSettings::default());

        let mut shards = ShardMap::new();
        shards.insert(ShardId(0), Bytes::from_static(b"abcd"));
        shards.insert(ShardId(7), Bytes::from_static(b"wxyz"));
        layout.write_shards(&shards).unwrap();

        assert!(layout.shard_path(ShardId(7)).ends_with("shard.7"));
        assert_eq!(layout.read_shards().unwrap(), shards);
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ShardDir::new(dir.path().join("nested"), OutputSettings::default());
        let manifest = Manifest {
            file_len: 10,
            stripe_len: 16,
            chunk_size: 4,
        };
        layout.write_manifest(&manifest).unwrap();
        assert_eq!(layout.read_manifest().unwrap(), manifest);
    }
}
