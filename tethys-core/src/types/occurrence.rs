//! Occurrence record types
//!
//! Raw records come off the wire with most analysis fields optional; cleaning
//! produces `CleanOccurrence` where the required fields are guaranteed by the
//! type rather than by convention. Raw records are never mutated in place.

use super::ecology::SymbiontState;
use super::stage::StageId;
use serde::{Deserialize, Serialize};

/// A fossil occurrence as reported by the occurrence database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Occurrence {
    pub occurrence_no: u64,
    pub collection_no: u64,
    pub genus: Option<String>,
    /// Order-level classification, when resolved
    pub order: Option<String>,
    /// Modern longitude in degrees east
    pub lng: Option<f64>,
    /// Modern latitude in degrees north
    pub lat: Option<f64>,
    /// Older bound of the reported age range, Ma
    pub max_ma: Option<f64>,
    /// Younger bound of the reported age range, Ma
    pub min_ma: Option<f64>,
    /// Rank the identification was accepted at (genus, species, ...)
    pub accepted_rank: Option<String>,
}

impl Occurrence {
    /// Midpoint of the reported age range, when both bounds are present
    pub fn age_mid_ma(&self) -> Option<f64> {
        match (self.max_ma, self.min_ma) {
            (Some(max), Some(min)) => Some((max + min) / 2.0),
            _ => None,
        }
    }

    /// Whether the identification is resolved to genus level or finer
    pub fn genus_resolved(&self) -> bool {
        match self.accepted_rank.as_deref() {
            Some(rank) => matches!(
                rank,
                "genus" | "subgenus" | "species" | "subspecies" | "variety" | "form"
            ),
            // Records without a reported rank are kept if a genus is present
            None => self.genus.is_some(),
        }
    }
}

/// An occurrence that survived cleaning: required fields are non-optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanOccurrence {
    pub occurrence_no: u64,
    pub collection_no: u64,
    pub genus: String,
    pub order: Option<String>,
    pub lng: f64,
    pub lat: f64,
    pub max_ma: f64,
    pub min_ma: f64,
    /// Ecological cohort from the trait table
    pub ecology: SymbiontState,
}

impl CleanOccurrence {
    pub fn age_mid_ma(&self) -> f64 {
        (self.max_ma + self.min_ma) / 2.0
    }
}

/// Deduplication key for collection-level work
///
/// Paleocoordinates and sampled temperatures are properties of a collection
/// at a stage, computed once and fanned back out to member occurrences.
/// Coordinates are keyed on their raw bit patterns so the key is hashable;
/// records of one collection share the reported coordinates verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionKey {
    pub collection_no: u64,
    lng_bits: u64,
    lat_bits: u64,
    pub stage: StageId,
}

impl CollectionKey {
    pub fn new(collection_no: u64, lng: f64, lat: f64, stage: StageId) -> Self {
        Self {
            collection_no,
            lng_bits: lng.to_bits(),
            lat_bits: lat.to_bits(),
            stage,
        }
    }

    pub fn lng(&self) -> f64 {
        f64::from_bits(self.lng_bits)
    }

    pub fn lat(&self) -> f64 {
        f64::from_bits(self.lat_bits)
    }
}
