//! CLI Commands

pub mod decode;
pub mod encode;
pub mod info;
pub mod repair;

pub use decode::run as decode;
pub use encode::run as encode;
pub use info::run as info;
pub use repair::run as repair;

/// Data-role shard ids in stripe order
pub(crate) fn data_shards(codec: &stripegate_core::StripeCodec) -> Vec<stripegate_core::ShardId> {
    (0..codec.data_chunk_count() as u8)
        .map(stripegate_core::ShardId)
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::OutputSettings;
    use crate::layout::ShardDir;
    use std::path::Path;
    use stripegate_core::{ProfileParams, ReedSolomonProvider, SharedProvider, StripeCodec};

    pub fn codec() -> StripeCodec {
        let shared = SharedProvider::from_provider(ReedSolomonProvider::new().unwrap());
        StripeCodec::new(ProfileParams::fixed(), &shared).unwrap()
    }

    pub fn layout(root: &Path) -> ShardDir {
        ShardDir::new(root.join("shards"), OutputSettings::default())
    }

    pub fn file_data(size: usize) -> Vec<u8> {
        (0..size).map(|i| (i * 13 % 256) as u8).collect()
    }
}
