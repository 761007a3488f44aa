//! Stage-to-raster-layer matching
//!
//! The raster series is sparse; every stage is mapped to the layer whose age
//! label is closest to the stage midpoint. The mapping is total: no distance
//! threshold is applied, and the chosen layer's age is carried into the
//! joined output so consumers can judge the gap themselves.

use tethys_core::StageTable;
use tethys_data::RasterSeries;

/// Index of the nearest layer for a target age.
///
/// `ages` must be ordered ascending; an exactly equidistant target resolves
/// to the earlier entry (the lower age label), because only a strict
/// improvement moves the selection.
pub fn nearest_layer(ages: &[f64], mid_ma: f64) -> usize {
    debug_assert!(!ages.is_empty());
    let mut best = 0usize;
    let mut best_dist = (ages[0] - mid_ma).abs();
    for (i, &age) in ages.iter().enumerate().skip(1) {
        let dist = (age - mid_ma).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Total mapping from stage index to raster-layer index
pub fn match_layers(table: &StageTable, series: &RasterSeries) -> Vec<usize> {
    let ages = series.ages();
    table
        .midpoints()
        .iter()
        .map(|&mid| nearest_layer(&ages, mid))
        .collect()
}
