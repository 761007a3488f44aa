//! The Tethys alignment pipeline
//!
//! Turns raw occurrence records plus a trait table, a raster series, and a
//! rotation model into the analysis-ready joined table: clean, bin onto
//! stages, reconstruct collection coordinates, match each stage to its
//! nearest raster layer, sample, and fan the collection-level values back
//! out to occurrences.

pub mod binning;
pub mod clean;
pub mod join;
pub mod matching;
pub mod reconstruct;
pub mod sample;

pub use binning::{bin_occurrences, BinnedOccurrence, BinningOutcome};
pub use clean::{clean_occurrences, CleanOptions};
pub use join::{read_joined_csv, run_pipeline, write_joined_csv, JoinOutput, JoinedRecord};
pub use matching::{match_layers, nearest_layer};
pub use reconstruct::reconstruct_collections;
pub use sample::sample_collections;
