//! Configuration management
//!
//! Config directory: ~/.stripegate/ (cross-platform)
//!
//! Config file format (~/.stripegate/config.toml):
//! ```toml
//! [profile]
//! k = 4
//! m = 5
//!
//! [output]
//! shard_prefix = "shard"
//! manifest_name = "manifest.json"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use stripegate_core::{ProfileParams, CODING_SHARDS, DATA_SHARDS};

/// Structure of ~/.stripegate/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StripeGateConfig {
    /// Erasure-code profile handed to the codec
    #[serde(default)]
    pub profile: ProfileSettings,

    /// Shard directory layout
    #[serde(default)]
    pub output: OutputSettings,
}

/// Profile parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_m")]
    pub m: usize,

    /// Additional parameters passed through untouched
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            k: default_k(),
            m: default_m(),
            extra: BTreeMap::new(),
        }
    }
}

impl ProfileSettings {
    pub fn to_params(&self) -> ProfileParams {
        self.extra
            .iter()
            .fold(ProfileParams::new(), |params, (key, value)| {
                params.with(key.clone(), value.clone())
            })
            .with("k", self.k.to_string())
            .with("m", self.m.to_string())
    }
}

fn default_k() -> usize {
    DATA_SHARDS
}

fn default_m() -> usize {
    CODING_SHARDS
}

/// Shard directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Shard files are named `<prefix>.<id>`
    #[serde(default = "default_shard_prefix")]
    pub shard_prefix: String,

    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            shard_prefix: default_shard_prefix(),
            manifest_name: default_manifest_name(),
        }
    }
}

fn default_shard_prefix() -> String {
    "shard".to_string()
}

fn default_manifest_name() -> String {
    "manifest.json".to_string()
}

pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".stripegate"))
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the config file, falling back to defaults when it is missing or broken
pub fn load_config(path: Option<&Path>) -> StripeGateConfig {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_file_path() {
            Ok(path) if path.exists() => path,
            _ => return StripeGateConfig::default(),
        },
    };

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to parse config, using defaults");
                StripeGateConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Failed to read config, using defaults");
            StripeGateConfig::default()
        }
    }
}

/// Profile parameters for the codec.
///
/// A config file, explicit or at the default location, is authoritative.
/// Without one, `STRIPEGATE_K`/`STRIPEGATE_M` are consulted.
pub fn profile_params(config: &StripeGateConfig, path: Option<&Path>) -> ProfileParams {
    let has_file = match path {
        Some(_) => true,
        None => config_file_path().map(|p| p.exists()).unwrap_or(false),
    };

    if has_file {
        config.profile.to_params()
    } else {
        ProfileParams::from_env()
    }
}

pub fn save_config(config: &StripeGateConfig) -> Result<PathBuf> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir).context("Failed to create config directory ~/.stripegate/")?;

    let path = dir.join("config.toml");
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, content).context("Failed to write config file")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_profile() {
        let config = StripeGateConfig::default();
        assert_eq!(config.profile.to_params(), ProfileParams::fixed());
        assert_eq!(config.output.shard_prefix, "shard");
    }

    #[test]
    fn test_parse_with_extra_params() {
        let config: StripeGateConfig = toml::from_str(
            r#"
            [profile]
            k = 4
            m = 5
            crush-failure-domain = "host"

            [output]
            shard_prefix = "part"
            "#,
        )
        .unwrap();

        let params = config.profile.to_params();
        assert_eq!(params.get("crush-failure-domain"), Some("host"));
        assert_eq!(params.get("k"), Some("4"));
        assert_eq!(config.output.shard_prefix, "part");
        assert_eq!(config.output.manifest_name, "manifest.json");
    }

    #[test]
    fn test_explicit_config_file_wins() {
        let config: StripeGateConfig = toml::from_str("[profile]\nk = 8\nm = 3\n").unwrap();
        let params = profile_params(&config, Some(Path::new("stripegate.toml")));
        assert_eq!(params.get("k"), Some("8"));
        assert_eq!(params.get("m"), Some("3"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml")));
        assert_eq!(config.profile.k, 4);
    }
}
