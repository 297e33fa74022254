//! Error types for StripeGate
//!
//! Provides a unified error type for all StripeGate operations.

use thiserror::Error;

/// Result type alias for StripeGate operations
pub type Result<T> = std::result::Result<T, StripeGateError>;

/// Coarse classification of every error the codec can surface.
///
/// Callers that own retry policy (e.g. trying a different shard subset after
/// `InsufficientShards`) match on this rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfiguration,
    InvalidArgument,
    InsufficientShards,
    Unreconstructible,
    ProviderUnavailable,
    Unsupported,
}

/// Unified error type for StripeGate
#[derive(Error, Debug)]
pub enum StripeGateError {
    // ===== Configuration Errors =====
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ===== Argument Errors =====
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid shard id: {id} (max: {max})")]
    InvalidShardId { id: i64, max: usize },

    #[error("Shard size mismatch for shard {shard}: expected {expected}, got {actual}")]
    ShardSizeMismatch {
        shard: u8,
        expected: usize,
        actual: usize,
    },

    // ===== Reconstruction Errors =====
    #[error("Insufficient shards: have {available}, need {required}")]
    InsufficientShards { available: usize, required: usize },

    #[error("Unreconstructible: {0}")]
    Unreconstructible(String),

    // ===== Provider Errors =====
    #[error("Codec provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl StripeGateError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StripeGateError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            StripeGateError::InvalidArgument(_)
            | StripeGateError::InvalidShardId { .. }
            | StripeGateError::ShardSizeMismatch { .. } => ErrorKind::InvalidArgument,
            StripeGateError::InsufficientShards { .. } => ErrorKind::InsufficientShards,
            StripeGateError::Unreconstructible(_) => ErrorKind::Unreconstructible,
            StripeGateError::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            StripeGateError::Unsupported(_) => ErrorKind::Unsupported,
        }
    }
}

impl From<reed_solomon_erasure::Error> for StripeGateError {
    fn from(err: reed_solomon_erasure::Error) -> Self {
        StripeGateError::Unreconstructible(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StripeGateError::InsufficientShards {
            available: 5,
            required: 6,
        };
        assert_eq!(err.to_string(), "Insufficient shards: have 5, need 6");
    }

    #[test]
    fn test_error_kind() {
        let err = StripeGateError::InvalidShardId { id: 9, max: 8 };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = StripeGateError::ShardSizeMismatch {
            shard: 2,
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = StripeGateError::Unsupported("encode_delta");
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_error_from_reed_solomon() {
        let err: StripeGateError = reed_solomon_erasure::Error::TooFewShardsPresent.into();
        assert_eq!(err.kind(), ErrorKind::Unreconstructible);
    }
}
