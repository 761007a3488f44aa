//! Temperature sampling at reconstructed collection positions
//!
//! Nearest-cell point sampling against the raster layer matched to each
//! collection's stage. Missing paleocoordinates and off-grid or nodata
//! cells propagate as missing values; a legitimate zero survives as a
//! value.

use std::collections::HashMap;
use tethys_core::CollectionKey;
use tethys_data::RasterSeries;
use tracing::debug;

/// Sample the matched raster layer at every reconstructed collection.
///
/// `layer_for_stage` is the total stage-to-layer mapping from
/// [`crate::matching::match_layers`]. The result maps every key of `paleo`.
pub fn sample_collections(
    paleo: &HashMap<CollectionKey, Option<(f64, f64)>>,
    layer_for_stage: &[usize],
    series: &RasterSeries,
) -> HashMap<CollectionKey, Option<f64>> {
    let layers = series.layers();
    let mut result = HashMap::with_capacity(paleo.len());
    let mut sampled = 0usize;

    for (&key, &point) in paleo {
        let value = point.and_then(|(lng, lat)| {
            layer_for_stage
                .get(key.stage.value() as usize)
                .and_then(|&li| layers.get(li))
                .and_then(|layer| layer.sample(lng, lat))
        });
        if value.is_some() {
            sampled += 1;
        }
        result.insert(key, value);
    }

    debug!(
        collections = result.len(),
        sampled, "sampled temperatures at collection positions"
    );
    result
}
