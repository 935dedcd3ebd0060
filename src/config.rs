//! YAML configuration for the clone-detection pipeline.
//!
//! Every stage configuration lives in one YAML file and is validated as a
//! whole before any document is touched. Missing sections and fields fall
//! back to their defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "tier1"
//! log_level: "info"
//!
//! extract:
//!   normalize_unicode: true
//!   remove_stopwords: true
//!   stem: true
//!   skip_text_tags: ["script", "style"]
//!
//! perceptual:
//!   num_hashes: 128
//!   seed: 17297687000019483309
//!   use_parallel: true
//!
//! index:
//!   threshold: 0.3          # or explicit bands / rows_per_band
//!
//! matcher:
//!   min_structure_sim: 0.65
//!   min_text_sim: 0.65
//!   structure_weight: 0.5
//!   class_weight: 0.3
//!   text_weight: 0.2
//!   combined_threshold: 0.7
//!   class_similarity: "lsh_constant"
//!   exhaustive_fallback: false
//!
//! cluster:
//!   link_bridges: false
//! ```

use std::fs;
use std::path::Path;

use canonical::ExtractConfig;
use cluster::ClusterConfig;
use index::LshConfig;
use matcher::FusionConfig;
use perceptual::PerceptualConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the configured log filter.
pub const LOG_ENV: &str = "WEBCLONE_LOG";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct WebcloneConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    pub name: Option<String>,

    /// Default `tracing` filter directive; `WEBCLONE_LOG` takes precedence.
    pub log_level: String,

    pub extract: ExtractConfig,
    pub perceptual: PerceptualConfig,
    pub index: IndexYamlConfig,
    pub matcher: FusionConfig,
    pub cluster: ClusterConfig,
}

impl Default for WebcloneConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            log_level: "info".to_string(),
            extract: ExtractConfig::default(),
            perceptual: PerceptualConfig::default(),
            index: IndexYamlConfig::default(),
            matcher: FusionConfig::default(),
            cluster: ClusterConfig::default(),
        }
    }
}

impl WebcloneConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: WebcloneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every stage section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.extract
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("extract: {e}")))?;
        self.perceptual
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("perceptual: {e}")))?;
        self.lsh_config()?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matcher: {e}")))?;
        self.cluster
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("cluster: {e}")))?;
        Ok(())
    }

    /// Banding parameters resolved against the configured signature length.
    pub fn lsh_config(&self) -> Result<LshConfig, ConfigLoadError> {
        self.index.resolve(self.perceptual.num_hashes)
    }

    /// Log filter directive: `WEBCLONE_LOG` if set, else `log_level`.
    pub fn log_filter(&self) -> String {
        std::env::var(LOG_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.log_level.clone())
    }
}

/// LSH section: either a target Jaccard `threshold`, from which bands and
/// rows are derived, or explicit `bands` x `rows_per_band`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexYamlConfig {
    pub bands: usize,
    pub rows_per_band: usize,
    /// Takes precedence over `bands`/`rows_per_band` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl Default for IndexYamlConfig {
    fn default() -> Self {
        let lsh = LshConfig::default();
        Self {
            bands: lsh.bands,
            rows_per_band: lsh.rows_per_band,
            threshold: None,
        }
    }
}

impl IndexYamlConfig {
    fn resolve(&self, num_hashes: usize) -> Result<LshConfig, ConfigLoadError> {
        let lsh = match self.threshold {
            Some(threshold) => LshConfig::from_threshold(threshold, num_hashes),
            None => {
                let lsh = LshConfig::new(self.bands, self.rows_per_band);
                lsh.validate().map(|()| lsh)
            }
        }
        .map_err(|e| ConfigLoadError::Validation(format!("index: {e}")))?;

        if lsh.signature_len() > num_hashes {
            return Err(ConfigLoadError::Validation(format!(
                "index: bands * rows_per_band ({}) exceeds perceptual.num_hashes ({num_hashes})",
                lsh.signature_len()
            )));
        }
        Ok(lsh)
    }
}
