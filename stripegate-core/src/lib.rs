//! StripeGate Core Library
//!
//! Safety-enforcing orchestration in front of a fixed-rate, black-box erasure
//! transform. This crate provides:
//! - The fixed (k=4, m=5) profile and its alignment arithmetic
//! - An availability gate that keeps decode inside the transform's reliable region
//! - Deterministic minimum read set selection
//! - Encode/decode orchestration against an injected codec provider
//! - A reference-counted provider handle and a Reed-Solomon reference provider
//! - Common types and error handling

pub mod alignment;
pub mod codec;
pub mod compat;
pub mod decode;
pub mod encode;
pub mod error;
pub mod flags;
pub mod gate;
pub mod profile;
pub mod provider;
pub mod reed_solomon;
pub mod selector;
pub mod shard;

pub use alignment::{chunk_size_for, original_size_for};
pub use codec::StripeCodec;
pub use error::{ErrorKind, Result, StripeGateError};
pub use flags::PluginFlags;
pub use gate::AvailabilityGate;
pub use profile::{Profile, ProfileParams};
pub use provider::{
    CodecProvider, CodecStatus, ProviderLease, ProviderLoader, SharedProvider, StaticLoader,
};
pub use reed_solomon::ReedSolomonProvider;
pub use selector::select_minimum_set;
pub use shard::{full_shard_set, ShardId, ShardMap, ShardRole, ShardSet};

/// Fixed transform configuration
/// - 4 data-role shards: contiguous slices of the stripe
/// - 5 coding-role shards: derivable only through the full transform
/// - 9 total shards, of which at least 6 must be present to decode
pub const DATA_SHARDS: usize = 4;
pub const CODING_SHARDS: usize = 5;
pub const TOTAL_SHARDS: usize = DATA_SHARDS + CODING_SHARDS;

/// Failures beyond this count leave the transform's proven-reliable region.
pub const MAX_TOLERATED_FAILURES: usize = 3;
pub const MIN_SHARDS_FOR_DECODE: usize = TOTAL_SHARDS - MAX_TOLERATED_FAILURES;

/// The transform consumes its input 4 bytes at a time.
pub const BASE_ALIGNMENT: usize = 4;
