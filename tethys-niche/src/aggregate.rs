//! Per-stage and lifetime niche summaries
//!
//! The per-stage table is sparse: a (genus, stage) cell exists only when at
//! least one member row carries a temperature. Lifetime windows (FAD/LAD)
//! come from every occurrence of a genus, sampled or not; the lifetime
//! median only from the sampled ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tethys_core::{StageId, SymbiontState};
use tethys_paleo::JoinedRecord;
use tracing::debug;

/// Median temperature of one genus in one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageNiche {
    pub genus: String,
    pub ecology: SymbiontState,
    pub stage: StageId,
    pub stage_name: String,
    /// Number of sampled temperatures behind the median
    pub n: usize,
    pub median_temp: f64,
}

/// Lifetime thermal niche of one genus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifetimeNiche {
    pub genus: String,
    pub ecology: SymbiontState,
    /// First appearance datum: earliest occupied stage
    pub fad: StageId,
    /// Last appearance datum: latest occupied stage
    pub lad: StageId,
    /// Number of sampled temperatures behind the median
    pub n: usize,
    pub median_temp: f64,
}

/// Median of a slice; `None` when empty
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Per-(genus, stage) medians over rows with a present temperature.
///
/// Output is sorted by genus then stage. Cells without any sampled
/// temperature are absent rather than zero.
pub fn stage_niches(records: &[JoinedRecord]) -> Vec<StageNiche> {
    let mut groups: BTreeMap<(String, StageId), (SymbiontState, String, Vec<f64>)> =
        BTreeMap::new();

    for record in records {
        let Some(temp) = record.temperature else {
            continue;
        };
        groups
            .entry((record.genus.clone(), record.stage))
            .or_insert_with(|| (record.ecology, record.stage_name.clone(), Vec::new()))
            .2
            .push(temp);
    }

    let niches: Vec<StageNiche> = groups
        .into_iter()
        .map(|((genus, stage), (ecology, stage_name, temps))| StageNiche {
            genus,
            ecology,
            stage,
            stage_name,
            n: temps.len(),
            // Non-empty by construction
            median_temp: median(&temps).unwrap(),
        })
        .collect();

    debug!(cells = niches.len(), "computed per-stage genus niches");
    niches
}

/// Per-genus lifetime windows and medians.
///
/// FAD/LAD span every occurrence of the genus; genera without a single
/// sampled temperature have no median and are omitted.
pub fn lifetime_niches(records: &[JoinedRecord]) -> Vec<LifetimeNiche> {
    struct Acc {
        ecology: SymbiontState,
        fad: StageId,
        lad: StageId,
        temps: Vec<f64>,
    }

    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    for record in records {
        let acc = groups.entry(record.genus.clone()).or_insert_with(|| Acc {
            ecology: record.ecology,
            fad: record.stage,
            lad: record.stage,
            temps: Vec::new(),
        });
        acc.fad = acc.fad.min(record.stage);
        acc.lad = acc.lad.max(record.stage);
        if let Some(temp) = record.temperature {
            acc.temps.push(temp);
        }
    }

    let niches: Vec<LifetimeNiche> = groups
        .into_iter()
        .filter_map(|(genus, acc)| {
            median(&acc.temps).map(|median_temp| LifetimeNiche {
                genus,
                ecology: acc.ecology,
                fad: acc.fad,
                lad: acc.lad,
                n: acc.temps.len(),
                median_temp,
            })
        })
        .collect();

    debug!(genera = niches.len(), "computed lifetime niches");
    niches
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(genus: &str, ecology: SymbiontState, stage: u16, temp: Option<f64>) -> JoinedRecord {
        JoinedRecord {
            occurrence_no: 0,
            collection_no: 0,
            genus: genus.to_string(),
            ecology,
            stage: StageId(stage),
            stage_name: format!("S{}", stage),
            age_mid_ma: 0.0,
            lng: 0.0,
            lat: 0.0,
            paleo_lng: None,
            paleo_lat: None,
            layer_age_ma: 0.0,
            temperature: temp,
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[5.0]), Some(5.0));
        assert_eq!(median(&[10.0, 20.0, 30.0]), Some(20.0));
        assert_eq!(median(&[30.0, 10.0, 20.0, 40.0]), Some(25.0));
    }

    #[test]
    fn test_stage_niche_median() {
        let records = vec![
            row("Acropora", SymbiontState::Symbiotic, 5, Some(10.0)),
            row("Acropora", SymbiontState::Symbiotic, 5, Some(20.0)),
            row("Acropora", SymbiontState::Symbiotic, 5, Some(30.0)),
        ];
        let niches = stage_niches(&records);
        assert_eq!(niches.len(), 1);
        assert_eq!(niches[0].median_temp, 20.0);
        assert_eq!(niches[0].n, 3);
    }

    #[test]
    fn test_stage_niche_table_is_sparse() {
        let records = vec![
            row("Acropora", SymbiontState::Symbiotic, 5, Some(25.0)),
            // Occupied stage without any sampled temperature: no cell
            row("Acropora", SymbiontState::Symbiotic, 6, None),
            row("Desmophyllum", SymbiontState::Asymbiotic, 6, Some(8.0)),
        ];
        let niches = stage_niches(&records);
        assert_eq!(niches.len(), 2);
        assert!(niches
            .iter()
            .all(|n| !(n.genus == "Acropora" && n.stage == StageId(6))));
    }

    #[test]
    fn test_lifetime_window_spans_unsampled_occurrences() {
        let records = vec![
            row("Acropora", SymbiontState::Symbiotic, 3, None),
            row("Acropora", SymbiontState::Symbiotic, 5, Some(24.0)),
            row("Acropora", SymbiontState::Symbiotic, 8, Some(26.0)),
        ];
        let niches = lifetime_niches(&records);
        assert_eq!(niches.len(), 1);
        // FAD comes from the unsampled stage-3 occurrence
        assert_eq!(niches[0].fad, StageId(3));
        assert_eq!(niches[0].lad, StageId(8));
        assert_eq!(niches[0].n, 2);
        assert_eq!(niches[0].median_temp, 25.0);
    }

    #[test]
    fn test_lifetime_omits_unsampled_genus() {
        let records = vec![row("Ghostia", SymbiontState::Asymbiotic, 4, None)];
        assert!(lifetime_niches(&records).is_empty());
    }

    #[test]
    fn test_single_stage_genus() {
        let records = vec![row("Pocillopora", SymbiontState::Symbiotic, 7, Some(22.0))];
        let niches = lifetime_niches(&records);
        assert_eq!(niches[0].fad, niches[0].lad);
        assert_eq!(niches[0].fad, StageId(7));
    }
}
