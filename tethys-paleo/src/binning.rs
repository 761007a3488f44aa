//! Stage assignment
//!
//! Midpoint containment: a record's age midpoint selects the stage whose
//! half-open `[top_ma, bottom_ma)` interval contains it, so a midpoint
//! exactly on a boundary belongs to the older stage. Records spanning
//! several stages are resolved by the midpoint alone. Midpoints older than
//! the oldest supported stage get no assignment and drop out here.

use tethys_core::{CleanOccurrence, StageId, StageTable};
use tracing::info;

/// A cleaned occurrence with its stage assignment
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedOccurrence {
    pub occurrence: CleanOccurrence,
    pub stage: StageId,
}

/// Result of binning a cleaned table
#[derive(Debug, Clone)]
pub struct BinningOutcome {
    pub binned: Vec<BinnedOccurrence>,
    /// Records whose midpoint predates the stage table
    pub unsupported: usize,
}

/// Assign a stage to one occurrence, if its midpoint is supported
pub fn assign_stage(occ: &CleanOccurrence, table: &StageTable) -> Option<StageId> {
    table.bin_age(occ.age_mid_ma())
}

/// Bin a cleaned table onto the stage table
pub fn bin_occurrences(cleaned: &[CleanOccurrence], table: &StageTable) -> BinningOutcome {
    let mut binned = Vec::with_capacity(cleaned.len());
    let mut unsupported = 0usize;

    for occ in cleaned {
        match assign_stage(occ, table) {
            Some(stage) => binned.push(BinnedOccurrence {
                occurrence: occ.clone(),
                stage,
            }),
            None => unsupported += 1,
        }
    }

    info!(
        binned = binned.len(),
        unsupported, "assigned stages to occurrence table"
    );
    BinningOutcome { binned, unsupported }
}
