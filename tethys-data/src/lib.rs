//! External dataset access for Tethys
//!
//! Everything the pipeline treats as an external collaborator lives here:
//! the versioned dataset cache, the occurrence and trait-table providers,
//! the gridded raster loader, and the plate-rotation service client.

pub mod cache;
pub mod occurrences;
pub mod raster;
pub mod rotation;
pub mod traits_table;

pub use cache::{DatasetCache, DatasetKey};
pub use occurrences::{parse_occurrences, OccurrenceQuery, PbdbClient};
pub use raster::{RasterLayer, RasterSeries};
pub use rotation::{GwsClient, PaleoRotator};
pub use traits_table::{fetch_trait_table_csv, load_trait_table, parse_trait_table};
