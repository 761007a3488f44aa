//! End-to-end pipeline test over a synthetic world: two genera, three
//! stages, and a raster series covering two of the three stage midpoints
//! exactly.

use anyhow::Result;
use tethys_core::{Occurrence, Stage, StageTable, SymbiontState, TraitTable};
use tethys_data::{PaleoRotator, RasterLayer, RasterSeries};
use tethys_paleo::{run_pipeline, CleanOptions};

/// Identity rotation: the synthetic world's plates never moved. One
/// configurable collection longitude is unresolvable at any age.
struct StaticWorldRotator {
    unresolvable_lng: Option<f64>,
}

impl PaleoRotator for StaticWorldRotator {
    fn reconstruct(&self, points: &[(f64, f64)], _age_ma: f64) -> Result<Vec<Option<(f64, f64)>>> {
        Ok(points
            .iter()
            .map(|&(lng, lat)| {
                if Some(lng) == self.unresolvable_lng {
                    None
                } else {
                    Some((lng, lat))
                }
            })
            .collect())
    }

    fn model(&self) -> &str {
        "STATIC"
    }
}

fn stage_table() -> StageTable {
    StageTable::from_stages(vec![
        Stage {
            name: "Oldstage".to_string(),
            system: "Synthetic".to_string(),
            top_ma: 10.0,
            bottom_ma: 20.0,
        },
        Stage {
            name: "Midstage".to_string(),
            system: "Synthetic".to_string(),
            top_ma: 5.0,
            bottom_ma: 10.0,
        },
        Stage {
            name: "Newstage".to_string(),
            system: "Synthetic".to_string(),
            top_ma: 0.0,
            bottom_ma: 5.0,
        },
    ])
}

fn uniform_layer(age_ma: f64, value: f64) -> RasterLayer {
    let text = format!(
        "ncols 4\nnrows 2\nxllcorner -180\nyllcorner -90\ncellsize 90\nNODATA_value -9999\n{v} {v} {v} {v}\n{v} {v} {v} {v}\n",
        v = value
    );
    RasterLayer::parse_ascii_grid(&text, age_ma).unwrap()
}

fn traits() -> TraitTable {
    let mut t = TraitTable::new();
    t.insert("Heliofungia", SymbiontState::Symbiotic);
    t.insert("Desmophyllum", SymbiontState::Asymbiotic);
    t
}

fn occ(n: u64, coll: u64, genus: &str, lng: f64, max_ma: f64, min_ma: f64) -> Occurrence {
    Occurrence {
        occurrence_no: n,
        collection_no: coll,
        genus: Some(genus.to_string()),
        order: Some("Scleractinia".to_string()),
        lng: Some(lng),
        lat: Some(10.0),
        max_ma: Some(max_ma),
        min_ma: Some(min_ma),
        accepted_rank: Some("genus".to_string()),
    }
}

#[test]
fn synthetic_world_joins_every_stage_to_nearest_layer() {
    let table = stage_table();
    // Layers at exactly the Oldstage (15 Ma) and Newstage (2.5 Ma) midpoints;
    // Midstage (7.5 Ma) has no layer of its own
    let series = RasterSeries::from_layers(
        "tos",
        vec![uniform_layer(15.0, 21.0), uniform_layer(2.5, 27.0)],
    );
    let rotator = StaticWorldRotator {
        unresolvable_lng: None,
    };

    let raw = vec![
        occ(1, 100, "Heliofungia", 60.0, 20.0, 10.0), // Oldstage
        occ(2, 101, "Heliofungia", 60.0, 10.0, 5.0),  // Midstage
        occ(3, 102, "Desmophyllum", -120.0, 10.0, 5.0), // Midstage
        occ(4, 103, "Desmophyllum", -120.0, 5.0, 0.0), // Newstage
    ];

    let output = run_pipeline(
        &raw,
        &traits(),
        &table,
        &series,
        &rotator,
        &CleanOptions::default(),
    );

    assert_eq!(output.summary.raw, 4);
    assert_eq!(output.summary.cleaned, 4);
    assert_eq!(output.summary.binned, 4);
    assert_eq!(output.summary.collections, 4);
    assert_eq!(output.records.len(), 4);

    // Every record sampled a temperature: the uncovered stage borrowed the
    // nearest layer rather than going missing
    for record in &output.records {
        assert!(record.temperature.is_some(), "{:?}", record);
    }

    let by_no = |n: u64| {
        output
            .records
            .iter()
            .find(|r| r.occurrence_no == n)
            .unwrap()
    };

    // Exact-midpoint stages use their own layer
    assert_eq!(by_no(1).layer_age_ma, 15.0);
    assert_eq!(by_no(1).temperature, Some(21.0));
    assert_eq!(by_no(4).layer_age_ma, 2.5);
    assert_eq!(by_no(4).temperature, Some(27.0));

    // The uncovered Midstage midpoint (7.5 Ma) is nearer the 2.5 Ma layer
    // (distance 5) than the 15 Ma layer (distance 7.5); the substitute's
    // age is recorded in the row
    assert_eq!(by_no(2).layer_age_ma, 2.5);
    assert_eq!(by_no(2).temperature, Some(27.0));
    assert_eq!(by_no(3).stage_name, "Midstage");
}

#[test]
fn unresolvable_collection_degrades_to_missing_temperature() {
    let table = stage_table();
    let series = RasterSeries::from_layers("tos", vec![uniform_layer(15.0, 21.0)]);
    let rotator = StaticWorldRotator {
        unresolvable_lng: Some(-120.0),
    };

    let raw = vec![
        occ(1, 100, "Heliofungia", 60.0, 20.0, 10.0),
        occ(2, 102, "Desmophyllum", -120.0, 10.0, 5.0),
    ];

    let output = run_pipeline(
        &raw,
        &traits(),
        &table,
        &series,
        &rotator,
        &CleanOptions::default(),
    );

    assert_eq!(output.summary.reconstructed, 1);
    assert_eq!(output.summary.sampled, 1);

    let resolved = output.records.iter().find(|r| r.occurrence_no == 1).unwrap();
    assert_eq!(resolved.paleo_lng, Some(60.0));
    assert_eq!(resolved.temperature, Some(21.0));

    let degraded = output.records.iter().find(|r| r.occurrence_no == 2).unwrap();
    assert_eq!(degraded.paleo_lng, None);
    assert_eq!(degraded.temperature, None);
}

#[test]
fn collection_values_fan_out_to_member_occurrences() {
    let table = stage_table();
    let series = RasterSeries::from_layers("tos", vec![uniform_layer(15.0, 21.0)]);
    let rotator = StaticWorldRotator {
        unresolvable_lng: None,
    };

    // Two occurrences of different genera share one collection
    let raw = vec![
        occ(1, 100, "Heliofungia", 60.0, 20.0, 10.0),
        occ(2, 100, "Desmophyllum", 60.0, 20.0, 10.0),
    ];

    let output = run_pipeline(
        &raw,
        &traits(),
        &table,
        &series,
        &rotator,
        &CleanOptions::default(),
    );

    // One collection, two rows, identical collection-level values
    assert_eq!(output.summary.collections, 1);
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[0].paleo_lng, output.records[1].paleo_lng);
    assert_eq!(output.records[0].temperature, output.records[1].temperature);
}
