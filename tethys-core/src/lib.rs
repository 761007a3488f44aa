//! Core utilities and types shared across all Tethys crates

pub mod config;
pub mod error;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, save_config, Config};
pub use error::{TethysError, TethysResult};

// Re-export core types
pub use types::{
    CleanOccurrence, CollectionKey, Occurrence, Provenance, Stage, StageId, StageTable,
    SymbiontState, TraitTable,
};

// Re-export system utilities
pub use system::{generate_utc_timestamp, tethys_cache_dir, tethys_home, tethys_output_dir};

/// Version information for the Tethys project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
