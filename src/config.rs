//! Configuration management for the generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (triple-gen.toml)
//! - Environment variables (TRIPLE_GEN__*)
//!
//! ## Example config file (triple-gen.toml):
//! ```toml
//! [alias]
//! stoplist = ["v\\d+", "api", "pkg", "internal", "external"]
//! max_length = 32
//! max_suffix_attempts = 16
//! hash_width = 8
//! reserved = ["context", "http"]
//!
//! [output]
//! file_suffix = ".triple.go"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Main generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Import alias settings
    #[serde(default)]
    pub alias: AliasConfig,

    /// Output naming
    #[serde(default)]
    pub output: OutputConfig,
}

/// Alias assignment bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Path segments dropped by the filtered candidate (case-insensitive regexes,
    /// each matched against a whole segment)
    #[serde(default = "default_stoplist")]
    pub stoplist: Vec<String>,

    /// Maximum length of the flattened-path candidate
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Numeric suffixes tried per candidate before moving on
    #[serde(default = "default_max_suffix_attempts")]
    pub max_suffix_attempts: usize,

    /// Hex digits in the hash fallback (clamped to 4..=64)
    #[serde(default = "default_hash_width")]
    pub hash_width: usize,

    /// Identifiers that may never be used as an alias
    #[serde(default)]
    pub reserved: Vec<String>,
}

/// Output file naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Appended to the schema path without its extension
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
}

// Default value functions
fn default_stoplist() -> Vec<String> {
    vec![
        r"v\d+((alpha|beta)\d*)?".to_string(),
        "api".to_string(),
        "pkg".to_string(),
        "internal".to_string(),
        "external".to_string(),
    ]
}

fn default_max_length() -> usize {
    32
}

fn default_max_suffix_attempts() -> usize {
    16
}

fn default_hash_width() -> usize {
    8
}

fn default_file_suffix() -> String {
    ".triple.go".to_string()
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            stoplist: default_stoplist(),
            max_length: default_max_length(),
            max_suffix_attempts: default_max_suffix_attempts(),
            hash_width: default_hash_width(),
            reserved: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_suffix: default_file_suffix(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally layering a specific file on top
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "triple-gen.toml",
            ".triple-gen.toml",
            "config/triple-gen.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("org", "dubbo", "triple-gen") {
            let xdg_config = config_dir.config_dir().join("triple-gen.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TRIPLE_GEN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_toml()?)
    }

    pub fn to_toml(&self) -> std::io::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
