//! Occurrence cleaning
//!
//! A pure filter from raw to cleaned records. Dropping is silent per row
//! (the drop reasons are tallied and logged once); an empty result is valid.

use tethys_core::{CleanOccurrence, Occurrence, TraitTable};
use tracing::info;

/// Cleaning parameters
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Keep only occurrences whose order matches (case-insensitive);
    /// `None` disables the restriction
    pub taxon: Option<String>,
    /// Oldest admissible age midpoint, Ma
    pub max_age_ma: f64,
    /// Youngest admissible age midpoint, Ma
    pub min_age_ma: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            taxon: None,
            max_age_ma: 251.902,
            min_age_ma: 0.0,
        }
    }
}

/// Filter raw occurrences down to analyzable records.
///
/// A record survives when it has a genus-level identification, valid
/// coordinates, both age bounds with a midpoint inside the configured
/// window, a cohort assignment in the trait table, and (when a taxon
/// restriction is set) a matching order. Running the cleaner on its own
/// output removes nothing further.
pub fn clean_occurrences(
    raw: &[Occurrence],
    traits: &TraitTable,
    opts: &CleanOptions,
) -> Vec<CleanOccurrence> {
    let mut kept = Vec::new();

    for occ in raw {
        let Some(genus) = occ.genus.as_deref() else {
            continue;
        };
        if genus.is_empty() || !occ.genus_resolved() {
            continue;
        }

        let (Some(lng), Some(lat)) = (occ.lng, occ.lat) else {
            continue;
        };
        if !lng.is_finite() || !lat.is_finite() || lng.abs() > 180.0 || lat.abs() > 90.0 {
            continue;
        }

        let (Some(max_ma), Some(min_ma)) = (occ.max_ma, occ.min_ma) else {
            continue;
        };
        let mid = (max_ma + min_ma) / 2.0;
        if !mid.is_finite() || mid > opts.max_age_ma || mid < opts.min_age_ma {
            continue;
        }

        if let Some(taxon) = opts.taxon.as_deref() {
            match occ.order.as_deref() {
                Some(order) if order.eq_ignore_ascii_case(taxon) => {}
                _ => continue,
            }
        }

        let Some(ecology) = traits.get(genus) else {
            continue;
        };

        kept.push(CleanOccurrence {
            occurrence_no: occ.occurrence_no,
            collection_no: occ.collection_no,
            genus: genus.to_string(),
            order: occ.order.clone(),
            lng,
            lat,
            max_ma,
            min_ma,
            ecology,
        });
    }

    info!(raw = raw.len(), kept = kept.len(), "cleaned occurrence table");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use tethys_core::SymbiontState;

    fn traits() -> TraitTable {
        let mut t = TraitTable::new();
        t.insert("Acropora", SymbiontState::Symbiotic);
        t.insert("Caryophyllia", SymbiontState::Asymbiotic);
        t
    }

    fn valid() -> Occurrence {
        Occurrence {
            occurrence_no: 1,
            collection_no: 10,
            genus: Some("Acropora".to_string()),
            order: Some("Scleractinia".to_string()),
            lng: Some(151.2),
            lat: Some(-23.4),
            max_ma: Some(10.0),
            min_ma: Some(5.0),
            accepted_rank: Some("genus".to_string()),
        }
    }

    #[test]
    fn test_valid_record_survives() {
        let cleaned = clean_occurrences(&[valid()], &traits(), &CleanOptions::default());
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].genus, "Acropora");
        assert_eq!(cleaned[0].ecology, SymbiontState::Symbiotic);
        assert_eq!(cleaned[0].age_mid_ma(), 7.5);
    }

    #[test]
    fn test_drop_reasons() {
        let no_genus = Occurrence {
            genus: None,
            ..valid()
        };
        let coarse_rank = Occurrence {
            accepted_rank: Some("family".to_string()),
            ..valid()
        };
        let no_coords = Occurrence {
            lat: None,
            ..valid()
        };
        let bad_coords = Occurrence {
            lat: Some(95.0),
            ..valid()
        };
        let no_ages = Occurrence {
            min_ma: None,
            ..valid()
        };
        let no_trait = Occurrence {
            genus: Some("Porites".to_string()),
            ..valid()
        };

        let raw = vec![no_genus, coarse_rank, no_coords, bad_coords, no_ages, no_trait];
        let cleaned = clean_occurrences(&raw, &traits(), &CleanOptions::default());
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_age_window() {
        let too_old = Occurrence {
            max_ma: Some(300.0),
            min_ma: Some(280.0),
            ..valid()
        };
        let opts = CleanOptions::default();
        assert!(clean_occurrences(&[too_old.clone()], &traits(), &opts).is_empty());

        // The midpoint, not the bounds, decides: a range straddling the
        // floor with an admissible midpoint survives
        let straddling = Occurrence {
            max_ma: Some(260.0),
            min_ma: Some(240.0),
            ..valid()
        };
        assert_eq!(clean_occurrences(&[straddling], &traits(), &opts).len(), 1);

        let too_young = Occurrence {
            max_ma: Some(4.0),
            min_ma: Some(0.0),
            ..valid()
        };
        let floor = CleanOptions {
            min_age_ma: 5.0,
            ..CleanOptions::default()
        };
        assert!(clean_occurrences(&[too_young], &traits(), &floor).is_empty());
    }

    #[test]
    fn test_taxon_restriction() {
        let other_order = Occurrence {
            order: Some("Rugosa".to_string()),
            ..valid()
        };
        let no_order = Occurrence {
            order: None,
            ..valid()
        };
        let opts = CleanOptions {
            taxon: Some("Scleractinia".to_string()),
            ..CleanOptions::default()
        };

        let cleaned = clean_occurrences(&[valid(), other_order, no_order], &traits(), &opts);
        assert_eq!(cleaned.len(), 1);

        let unrestricted = CleanOptions::default();
        let cleaned = clean_occurrences(
            &[valid(), Occurrence { order: Some("Rugosa".to_string()), ..valid() }],
            &traits(),
            &unrestricted,
        );
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let raw = vec![
            valid(),
            Occurrence {
                occurrence_no: 2,
                genus: Some("Caryophyllia".to_string()),
                ..valid()
            },
            Occurrence {
                occurrence_no: 3,
                genus: None,
                ..valid()
            },
        ];
        let opts = CleanOptions::default();
        let once = clean_occurrences(&raw, &traits(), &opts);

        // Re-run over the survivors, restored to the raw shape
        let as_raw: Vec<Occurrence> = once
            .iter()
            .map(|c| Occurrence {
                occurrence_no: c.occurrence_no,
                collection_no: c.collection_no,
                genus: Some(c.genus.clone()),
                order: c.order.clone(),
                lng: Some(c.lng),
                lat: Some(c.lat),
                max_ma: Some(c.max_ma),
                min_ma: Some(c.min_ma),
                accepted_rank: Some("genus".to_string()),
            })
            .collect();
        let twice = clean_occurrences(&as_raw, &traits(), &opts);
        assert_eq!(once, twice);
    }
}
