//! Fixed transform profile
//!
//! The transform is only reliable for one configuration, so the profile is a
//! constant record. Parameter maps coming from the surrounding storage system
//! are validated against it and rejected on any disagreement.

use crate::error::{Result, StripeGateError};
use crate::{
    BASE_ALIGNMENT, CODING_SHARDS, DATA_SHARDS, MAX_TOLERATED_FAILURES, MIN_SHARDS_FOR_DECODE,
    TOTAL_SHARDS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String-keyed erasure-code profile as handed over by the storage layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileParams(BTreeMap<String, String>);

impl ProfileParams {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parameters describing the fixed configuration
    pub fn fixed() -> Self {
        Self::new()
            .with("k", DATA_SHARDS.to_string())
            .with("m", CODING_SHARDS.to_string())
    }

    /// Read `k`/`m` from STRIPEGATE_K / STRIPEGATE_M, falling back to the
    /// fixed values.
    pub fn from_env() -> Self {
        let k = std::env::var("STRIPEGATE_K").unwrap_or_else(|_| DATA_SHARDS.to_string());
        let m = std::env::var("STRIPEGATE_M").unwrap_or_else(|_| CODING_SHARDS.to_string());
        Self::new().with("k", k).with("m", m)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, String>> for ProfileParams {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Immutable description of the transform's operating region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Number of data-role shards (k)
    pub k: usize,
    /// Number of coding-role shards (m)
    pub m: usize,
    /// Total shards (n = k + m)
    pub n: usize,
    /// Smallest shard count the transform is proven to decode from
    pub min_shards_for_decode: usize,
    /// Missing shards tolerated inside the reliable region
    pub max_tolerated_failures: usize,
    /// Byte granularity of the transform's input
    pub base_alignment: usize,
}

impl Profile {
    pub const FIXED: Profile = Profile {
        k: DATA_SHARDS,
        m: CODING_SHARDS,
        n: TOTAL_SHARDS,
        min_shards_for_decode: MIN_SHARDS_FOR_DECODE,
        max_tolerated_failures: MAX_TOLERATED_FAILURES,
        base_alignment: BASE_ALIGNMENT,
    };

    /// Validate a parameter map against the fixed profile.
    ///
    /// Both `k` and `m` are required. Any other keys are carried along
    /// untouched by the caller.
    pub fn from_params(params: &ProfileParams) -> Result<Self> {
        let k = parse_required(params, "k")?;
        let m = parse_required(params, "m")?;

        if k != DATA_SHARDS || m != CODING_SHARDS {
            return Err(StripeGateError::InvalidConfiguration(format!(
                "requires k={} and m={}, got k={} and m={}",
                DATA_SHARDS, CODING_SHARDS, k, m
            )));
        }

        Ok(Self::FIXED)
    }

    /// k × base_alignment: every padded stripe is a multiple of this
    pub fn k_alignment(&self) -> usize {
        self.k * self.base_alignment
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::FIXED
    }
}

fn parse_required(params: &ProfileParams, key: &str) -> Result<usize> {
    let raw = params.get(key).ok_or_else(|| {
        StripeGateError::InvalidConfiguration(format!("missing required parameter '{}'", key))
    })?;
    raw.trim().parse::<usize>().map_err(|e| {
        StripeGateError::InvalidConfiguration(format!("parameter '{}'='{}': {}", key, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_fixed_profile_invariants() {
        let p = Profile::FIXED;
        assert_eq!(p.n, p.k + p.m);
        assert_eq!(p.min_shards_for_decode, p.n - p.max_tolerated_failures);
        assert_eq!(p.k_alignment(), 16);
    }

    #[test]
    fn test_from_params_accepts_fixed() {
        let profile = Profile::from_params(&ProfileParams::fixed()).unwrap();
        assert_eq!(profile, Profile::FIXED);
    }

    #[test]
    fn test_from_params_rejects_mismatch() {
        let params = ProfileParams::new().with("k", "10").with("m", "4");
        let err = Profile::from_params(&params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_from_params_requires_k_and_m() {
        let params = ProfileParams::new().with("k", "4");
        let err = Profile::from_params(&params).unwrap_err();
        assert!(err.to_string().contains("'m'"));

        let params = ProfileParams::new().with("k", "four").with("m", "5");
        assert_eq!(
            Profile::from_params(&params).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );
    }

    #[test]
    fn test_from_env_override_and_fallback() {
        // Single test owns both variables so parallel tests never race on them
        std::env::set_var("STRIPEGATE_K", "8");
        std::env::set_var("STRIPEGATE_M", "3");
        let params = ProfileParams::from_env();
        assert_eq!(params.get("k"), Some("8"));
        assert_eq!(params.get("m"), Some("3"));
        assert_eq!(
            Profile::from_params(&params).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );

        std::env::remove_var("STRIPEGATE_K");
        std::env::remove_var("STRIPEGATE_M");
        let params = ProfileParams::from_env();
        assert_eq!(params, ProfileParams::fixed());
        assert_eq!(Profile::from_params(&params).unwrap(), Profile::FIXED);
    }

    #[test]
    fn test_extra_params_are_ignored() {
        let params = ProfileParams::fixed().with("plugin", "stripegate");
        assert!(Profile::from_params(&params).is_ok());
    }
}
