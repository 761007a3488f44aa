//! Process-wide filesystem locations and timestamps

use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the paths to avoid repeated environment lookups
static TETHYS_HOME: OnceLock<PathBuf> = OnceLock::new();
static TETHYS_CACHE_DIR: OnceLock<PathBuf> = OnceLock::new();
static TETHYS_OUTPUT_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Generate a UTC timestamp for provenance records
/// Returns format: YYYYMMDD_HHMMSS (in UTC timezone)
pub fn generate_utc_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Get the Tethys home directory
/// Checks TETHYS_HOME environment variable, falls back to ${HOME}/.tethys
pub fn tethys_home() -> PathBuf {
    TETHYS_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TETHYS_HOME") {
                PathBuf::from(path)
            } else {
                let home = std::env::var("HOME").unwrap_or_else(|_| {
                    std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string())
                });
                PathBuf::from(home).join(".tethys")
            }
        })
        .clone()
}

/// Get the dataset cache directory
/// Checks TETHYS_CACHE_DIR environment variable, falls back to TETHYS_HOME/cache
pub fn tethys_cache_dir() -> PathBuf {
    TETHYS_CACHE_DIR
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TETHYS_CACHE_DIR") {
                PathBuf::from(path)
            } else {
                tethys_home().join("cache")
            }
        })
        .clone()
}

/// Get the default output directory for generated tables
pub fn tethys_output_dir() -> PathBuf {
    TETHYS_OUTPUT_DIR
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TETHYS_OUTPUT_DIR") {
                PathBuf::from(path)
            } else {
                PathBuf::from("output")
            }
        })
        .clone()
}
