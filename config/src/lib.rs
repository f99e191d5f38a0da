//! Aegis Configuration
//!
//! Shared configuration crate for the Aegis tools.
//!
//! Handles loading configuration from:
//! 1. AEGIS_CONFIG env var (explicit path)
//! 2. ./aegis.toml (current directory)
//! 3. ~/.aegis/aegis.toml (user home)
//!
//! Environment variables take precedence over TOML config.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

const CONFIG_FILE_NAME: &str = "aegis.toml";
const CONFIG_DIR_NAME: &str = ".aegis";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_PUBLIC_KEY_PATH: &str = "./aegis-keys/public_key.json";
const DEFAULT_OUTPUT_DIR: &str = "./aegis-out";
const DEFAULT_SHARE_DIR: &str = "./aegis-keys";
const DEFAULT_THRESHOLD: usize = 2;
const DEFAULT_TOTAL_SHARES: usize = 3;
const DEFAULT_TREE_DEPTH: usize = 16;

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AegisConfig {
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub threshold: ThresholdConfig,
    #[serde(default)]
    pub merkle: MerkleConfig,
}

/// Audit encryption configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Auditor RLWE public key artifact (JSON)
    #[serde(default = "default_public_key_path")]
    pub public_key_path: PathBuf,
    /// Where `Prover.toml` and `ciphertext.json` are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            public_key_path: default_public_key_path(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_public_key_path() -> PathBuf {
    DEFAULT_PUBLIC_KEY_PATH.into()
}
fn default_output_dir() -> PathBuf {
    DEFAULT_OUTPUT_DIR.into()
}

/// Threshold decryption configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_share_dir")]
    pub share_dir: PathBuf,
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    #[serde(default = "default_total_shares")]
    pub total_shares: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            share_dir: default_share_dir(),
            threshold: DEFAULT_THRESHOLD,
            total_shares: DEFAULT_TOTAL_SHARES,
        }
    }
}

fn default_share_dir() -> PathBuf {
    DEFAULT_SHARE_DIR.into()
}
fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}
fn default_total_shares() -> usize {
    DEFAULT_TOTAL_SHARES
}

/// Merkle accumulator settings (informational; the depth is fixed by the circuit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleConfig {
    #[serde(default = "default_tree_depth")]
    pub depth: usize,
}

impl Default for MerkleConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_TREE_DEPTH,
        }
    }
}

fn default_tree_depth() -> usize {
    DEFAULT_TREE_DEPTH
}

// ============================================================================
// Override Helpers
// ============================================================================

/// Set path from a variable if present
fn override_path(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut PathBuf) {
    if let Some(v) = lookup(key) {
        *field = PathBuf::from(v);
    }
}

/// Set field from a variable if present and parseable
fn override_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    field: &mut T,
) {
    if let Some(v) = lookup(key) {
        match v.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => log::warn!("ignoring unparseable {key}={v:?}"),
        }
    }
}

// ============================================================================
// Implementation
// ============================================================================

impl AegisConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::read_file(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check AEGIS_CONFIG env var
        if let Ok(path) = env::var("AEGIS_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("AEGIS_CONFIG points at missing file {}", path.display());
        }

        // 2. Check ./aegis.toml (current directory)
        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        // 3. Check ~/.aegis/aegis.toml
        Self::default_config_path().filter(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Audit
        override_path(&lookup, "AEGIS_PUBLIC_KEY", &mut self.audit.public_key_path);
        override_path(&lookup, "AEGIS_OUTPUT_DIR", &mut self.audit.output_dir);

        // Threshold
        override_path(&lookup, "AEGIS_SHARE_DIR", &mut self.threshold.share_dir);
        override_parse(&lookup, "AEGIS_THRESHOLD", &mut self.threshold.threshold);
        override_parse(&lookup, "AEGIS_TOTAL_SHARES", &mut self.threshold.total_shares);
    }

    /// Reject settings no deal could satisfy
    pub fn validate(&self) -> Result<()> {
        let t = &self.threshold;
        if t.threshold == 0 || t.threshold > t.total_shares {
            bail!(
                "invalid threshold {} of {} shares",
                t.threshold,
                t.total_shares
            );
        }
        if self.merkle.depth != DEFAULT_TREE_DEPTH {
            log::warn!(
                "merkle.depth = {} is informational; the tree depth is fixed at {}",
                self.merkle.depth,
                DEFAULT_TREE_DEPTH
            );
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AegisConfig::default();
        assert_eq!(
            config.audit.public_key_path,
            PathBuf::from(DEFAULT_PUBLIC_KEY_PATH)
        );
        assert_eq!(config.threshold.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.merkle.depth, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_sample() {
        let sample = AegisConfig::generate_sample();
        assert!(sample.contains("[audit]"));
        assert!(sample.contains("[threshold]"));
        assert!(sample.contains("[merkle]"));
    }

    #[test]
    fn test_parse_sample() {
        let sample = AegisConfig::generate_sample();
        let parsed: AegisConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, AegisConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: AegisConfig = toml::from_str("[threshold]\nthreshold = 3\n").unwrap();
        assert_eq!(parsed.threshold.threshold, 3);
        assert_eq!(parsed.threshold.total_shares, DEFAULT_TOTAL_SHARES);
        assert_eq!(parsed.audit, AuditConfig::default());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = AegisConfig::default();
        config.apply_overrides(vars(&[
            ("AEGIS_PUBLIC_KEY", "/keys/pk.json"),
            ("AEGIS_SHARE_DIR", "/shares"),
            ("AEGIS_THRESHOLD", "3"),
            ("AEGIS_TOTAL_SHARES", "not-a-number"),
        ]));

        assert_eq!(config.audit.public_key_path, PathBuf::from("/keys/pk.json"));
        assert_eq!(config.audit.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.threshold.share_dir, PathBuf::from("/shares"));
        assert_eq!(config.threshold.threshold, 3);
        assert_eq!(config.threshold.total_shares, DEFAULT_TOTAL_SHARES);
    }

    #[test]
    fn test_validate_rejects_impossible_threshold() {
        let mut config = AegisConfig::default();
        config.threshold.threshold = 4;
        assert!(config.validate().is_err());
        config.threshold.threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[audit]\noutput_dir = \"/tmp/aegis\"\n").unwrap();

        let config = AegisConfig::load_from(&path).unwrap();
        assert_eq!(config.audit.output_dir, PathBuf::from("/tmp/aegis"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AegisConfig::load_from(&dir.path().join("nope.toml")).is_err());
    }
}
