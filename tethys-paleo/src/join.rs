//! Pipeline assembly and the joined analysis table
//!
//! Drives clean -> bin -> dedupe collections -> reconstruct -> match ->
//! sample and fans the collection-level results back out to occurrences.
//! All per-record gaps stay in the table as missing values; consumers that
//! need completeness filter at their own step.

use crate::binning::bin_occurrences;
use crate::clean::{clean_occurrences, CleanOptions};
use crate::matching::match_layers;
use crate::reconstruct::reconstruct_collections;
use crate::sample::sample_collections;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tethys_core::{CollectionKey, Occurrence, StageId, StageTable, SymbiontState, TraitTable};
use tethys_data::{PaleoRotator, RasterSeries};
use tracing::info;

/// One row of the analysis-ready joined table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub occurrence_no: u64,
    pub collection_no: u64,
    pub genus: String,
    pub ecology: SymbiontState,
    pub stage: StageId,
    pub stage_name: String,
    /// Age midpoint of the occurrence itself, Ma
    pub age_mid_ma: f64,
    /// Modern coordinates as reported
    pub lng: f64,
    pub lat: f64,
    /// Reconstructed position at the stage midpoint, when the model resolved it
    pub paleo_lng: Option<f64>,
    pub paleo_lat: Option<f64>,
    /// Age label of the raster layer the temperature was sampled from
    pub layer_age_ma: f64,
    pub temperature: Option<f64>,
}

/// Stage-by-stage record counts for reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub raw: usize,
    pub cleaned: usize,
    pub binned: usize,
    pub unsupported_age: usize,
    pub collections: usize,
    pub reconstructed: usize,
    pub sampled: usize,
}

/// Joined table plus its run summary
#[derive(Debug, Clone)]
pub struct JoinOutput {
    pub records: Vec<JoinedRecord>,
    pub summary: PipelineSummary,
}

/// Run the full alignment pipeline over an in-memory occurrence table.
///
/// Infallible by construction: dataset loading happens before this call and
/// every per-record failure inside the pipeline degrades to a missing value.
pub fn run_pipeline(
    raw: &[Occurrence],
    traits: &TraitTable,
    table: &StageTable,
    series: &RasterSeries,
    rotator: &dyn PaleoRotator,
    opts: &CleanOptions,
) -> JoinOutput {
    let cleaned = clean_occurrences(raw, traits, opts);
    let outcome = bin_occurrences(&cleaned, table);

    // Collection-level work is computed once per distinct tuple
    let collections: Vec<CollectionKey> = {
        let mut seen = HashSet::new();
        outcome
            .binned
            .iter()
            .map(|b| {
                CollectionKey::new(
                    b.occurrence.collection_no,
                    b.occurrence.lng,
                    b.occurrence.lat,
                    b.stage,
                )
            })
            .filter(|k| seen.insert(*k))
            .collect()
    };

    let paleo = reconstruct_collections(&collections, table, rotator);
    let layer_for_stage = match_layers(table, series);
    let temps = sample_collections(&paleo, &layer_for_stage, series);

    let layers = series.layers();
    let records: Vec<JoinedRecord> = outcome
        .binned
        .iter()
        .map(|b| {
            let key = CollectionKey::new(
                b.occurrence.collection_no,
                b.occurrence.lng,
                b.occurrence.lat,
                b.stage,
            );
            let point = paleo.get(&key).copied().flatten();
            let temperature = temps.get(&key).copied().flatten();
            let layer_age_ma = layers[layer_for_stage[b.stage.value() as usize]].age_ma;

            JoinedRecord {
                occurrence_no: b.occurrence.occurrence_no,
                collection_no: b.occurrence.collection_no,
                genus: b.occurrence.genus.clone(),
                ecology: b.occurrence.ecology,
                stage: b.stage,
                stage_name: table.get(b.stage).map(|s| s.name.clone()).unwrap_or_default(),
                age_mid_ma: b.occurrence.age_mid_ma(),
                lng: b.occurrence.lng,
                lat: b.occurrence.lat,
                paleo_lng: point.map(|(lng, _)| lng),
                paleo_lat: point.map(|(_, lat)| lat),
                layer_age_ma,
                temperature,
            }
        })
        .collect();

    let summary = PipelineSummary {
        raw: raw.len(),
        cleaned: cleaned.len(),
        binned: outcome.binned.len(),
        unsupported_age: outcome.unsupported,
        collections: collections.len(),
        reconstructed: paleo.values().filter(|p| p.is_some()).count(),
        sampled: temps.values().filter(|t| t.is_some()).count(),
    };

    info!(
        raw = summary.raw,
        cleaned = summary.cleaned,
        binned = summary.binned,
        collections = summary.collections,
        sampled = summary.sampled,
        "joined occurrence table"
    );
    JoinOutput { records, summary }
}

/// Write the joined table as CSV
pub fn write_joined_csv(records: &[JoinedRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create joined table: {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a joined table back from CSV
pub fn read_joined_csv(path: &Path) -> Result<Vec<JoinedRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open joined table: {}", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row.context("malformed joined table row")?);
    }
    Ok(records)
}
