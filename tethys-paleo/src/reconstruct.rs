//! Collection-level coordinate reconstruction
//!
//! One rotation-service call per distinct stage, at the stage midpoint, over
//! that stage's unique collections. A failed call degrades every collection
//! of that stage to a missing paleoposition; it never aborts the run.

use std::collections::{BTreeMap, HashMap};
use tethys_core::{CollectionKey, StageTable};
use tethys_data::PaleoRotator;
use tracing::{debug, warn};

/// Reconstruct paleocoordinates for a set of collections.
///
/// The result maps every input key; `None` marks collections the rotation
/// model could not place (age outside model coverage, point on an unmodeled
/// plate, or a failed service call for that stage's batch).
pub fn reconstruct_collections(
    collections: &[CollectionKey],
    table: &StageTable,
    rotator: &dyn PaleoRotator,
) -> HashMap<CollectionKey, Option<(f64, f64)>> {
    // Group by stage; BTreeMap keeps the call order deterministic
    let mut by_stage: BTreeMap<_, Vec<CollectionKey>> = BTreeMap::new();
    for &key in collections {
        by_stage.entry(key.stage).or_default().push(key);
    }

    let mut result = HashMap::with_capacity(collections.len());
    for (stage, keys) in by_stage {
        let Some(stage_ref) = table.get(stage) else {
            // Collections only carry stages the binner produced; an unknown
            // id means the caller mixed tables
            warn!(stage = %stage, "collection references an unknown stage");
            for key in keys {
                result.insert(key, None);
            }
            continue;
        };

        let age = stage_ref.mid_ma();
        let points: Vec<(f64, f64)> = keys.iter().map(|k| (k.lng(), k.lat())).collect();

        match rotator.reconstruct(&points, age) {
            Ok(paleo) => {
                debug!(
                    stage = %stage_ref.name,
                    age_ma = age,
                    points = points.len(),
                    resolved = paleo.iter().filter(|p| p.is_some()).count(),
                    "reconstructed collections"
                );
                for (key, point) in keys.into_iter().zip(paleo) {
                    result.insert(key, point);
                }
            }
            Err(e) => {
                warn!(
                    stage = %stage_ref.name,
                    age_ma = age,
                    error = %e,
                    "reconstruction failed for stage; coordinates degraded to missing"
                );
                for key in keys {
                    result.insert(key, None);
                }
            }
        }
    }

    result
}
