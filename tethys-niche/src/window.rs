//! Time-windowed cohort trend
//!
//! For each stage and cohort, the mean of the lifetime medians of every
//! genus whose [FAD, LAD] window contains the stage. A genus contributes
//! its single lifetime value to each stage it ranged through, which smooths
//! the per-stage signal into one representative trend line per cohort.

use crate::aggregate::LifetimeNiche;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tethys_core::{StageId, StageTable, SymbiontState};

/// Smoothed cohort value at one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedTrend {
    pub stage: StageId,
    pub stage_name: String,
    pub ecology: SymbiontState,
    /// Genera whose lifetime window contains this stage
    pub n_genera: usize,
    pub mean_temp: f64,
}

/// Windowed means for every (stage, cohort) with at least one live genus.
///
/// Output is ordered by stage then cohort; stages where a cohort has no
/// genus in range produce no row.
pub fn windowed_trend(lifetimes: &[LifetimeNiche], table: &StageTable) -> Vec<WindowedTrend> {
    let mut sums: BTreeMap<(StageId, SymbiontState), (usize, f64)> = BTreeMap::new();

    for niche in lifetimes {
        for idx in niche.fad.value()..=niche.lad.value() {
            let entry = sums.entry((StageId(idx), niche.ecology)).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += niche.median_temp;
        }
    }

    sums.into_iter()
        .filter(|((stage, _), _)| table.get(*stage).is_some())
        .map(|((stage, ecology), (n, sum))| WindowedTrend {
            stage,
            stage_name: table.get(stage).map(|s| s.name.clone()).unwrap_or_default(),
            ecology,
            n_genera: n,
            mean_temp: sum / n as f64,
        })
        .collect()
}
