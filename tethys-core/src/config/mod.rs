//! Configuration types for Tethys

use crate::TethysError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where datasets come from and where they are cached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset cache directory (defaults to TETHYS_HOME/cache)
    #[serde(default)]
    pub cache_dir: Option<String>,
    /// Base URL of the occurrence database API
    #[serde(default = "default_occurrence_base_url")]
    pub occurrence_base_url: String,
    /// Base URL of the plate-rotation web service
    #[serde(default = "default_rotation_base_url")]
    pub rotation_base_url: String,
    /// Rotation model identifier passed to the reconstruction service
    #[serde(default = "default_rotation_model")]
    pub rotation_model: String,
    /// Serve everything from the cache; any cache miss is an error
    #[serde(default = "default_offline")]
    pub offline: bool,
    /// HTTP timeout in seconds for both remote services
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

/// Filters applied while cleaning the occurrence table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Restrict occurrences to this order-level clade (empty = no restriction)
    #[serde(default = "default_taxon")]
    pub taxon: String,
    /// Oldest admissible age midpoint in Ma
    #[serde(default = "default_max_age_ma")]
    pub max_age_ma: f64,
    /// Youngest admissible age midpoint in Ma
    #[serde(default = "default_min_age_ma")]
    pub min_age_ma: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated CSV tables
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

// Default value functions
fn default_occurrence_base_url() -> String {
    "https://paleobiodb.org/data1.2".to_string()
}
fn default_rotation_base_url() -> String {
    "https://gws.gplates.org".to_string()
}
fn default_rotation_model() -> String {
    "MULLER2022".to_string()
}
fn default_offline() -> bool {
    false
}
fn default_http_timeout_secs() -> u64 {
    300
}
fn default_taxon() -> String {
    "Scleractinia".to_string()
}
// Base of the Triassic; older occurrences are outside the supported window
fn default_max_age_ma() -> f64 {
    251.902
}
fn default_min_age_ma() -> f64 {
    0.0
}
fn default_output_dir() -> String {
    "output".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            occurrence_base_url: default_occurrence_base_url(),
            rotation_base_url: default_rotation_base_url(),
            rotation_model: default_rotation_model(),
            offline: default_offline(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            taxon: default_taxon(),
            max_age_ma: default_max_age_ma(),
            min_age_ma: default_min_age_ma(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, TethysError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| TethysError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), TethysError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| TethysError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
