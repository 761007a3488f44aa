//! Ecological cohort classification
//!
//! The two compared cohorts are genera with photosymbionts ("Z") and genera
//! without ("AZ"). The assignment comes from a genus-level trait table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Photosymbiosis state of a genus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbiontState {
    /// Zooxanthellate: hosts photosymbionts
    #[serde(rename = "z")]
    Symbiotic,
    /// Azooxanthellate: no photosymbionts
    #[serde(rename = "az")]
    Asymbiotic,
}

impl SymbiontState {
    /// Parse a trait-table label. Accepts the short codes and the
    /// spelled-out forms, case-insensitive.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "z" | "zooxanthellate" | "symbiotic" | "photosymbiotic" => Some(Self::Symbiotic),
            "az" | "azooxanthellate" | "asymbiotic" | "aposymbiotic" => Some(Self::Asymbiotic),
            _ => None,
        }
    }

    /// Short code used in output tables
    pub fn code(&self) -> &'static str {
        match self {
            Self::Symbiotic => "z",
            Self::Asymbiotic => "az",
        }
    }
}

impl fmt::Display for SymbiontState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Genus-keyed ecology lookup built from the trait table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraitTable {
    by_genus: HashMap<String, SymbiontState>,
}

impl TraitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an assignment. Later duplicates overwrite earlier ones; the
    /// trait table is expected to carry one row per genus.
    pub fn insert(&mut self, genus: impl Into<String>, state: SymbiontState) {
        self.by_genus.insert(genus.into(), state);
    }

    pub fn get(&self, genus: &str) -> Option<SymbiontState> {
        self.by_genus.get(genus).copied()
    }

    pub fn len(&self) -> usize {
        self.by_genus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_genus.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbiontState)> {
        self.by_genus.iter().map(|(g, s)| (g.as_str(), *s))
    }
}

impl FromIterator<(String, SymbiontState)> for TraitTable {
    fn from_iter<I: IntoIterator<Item = (String, SymbiontState)>>(iter: I) -> Self {
        Self {
            by_genus: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!(SymbiontState::parse("z"), Some(SymbiontState::Symbiotic));
        assert_eq!(SymbiontState::parse("AZ"), Some(SymbiontState::Asymbiotic));
        assert_eq!(
            SymbiontState::parse(" Zooxanthellate "),
            Some(SymbiontState::Symbiotic)
        );
        assert_eq!(
            SymbiontState::parse("azooxanthellate"),
            Some(SymbiontState::Asymbiotic)
        );
        assert_eq!(SymbiontState::parse("apo"), None);
        assert_eq!(SymbiontState::parse(""), None);
    }

    #[test]
    fn test_codes() {
        assert_eq!(SymbiontState::Symbiotic.code(), "z");
        assert_eq!(SymbiontState::Asymbiotic.code(), "az");
        assert_eq!(format!("{}", SymbiontState::Symbiotic), "z");
    }

    #[test]
    fn test_trait_table_lookup() {
        let mut table = TraitTable::new();
        table.insert("Acropora", SymbiontState::Symbiotic);
        table.insert("Caryophyllia", SymbiontState::Asymbiotic);

        assert_eq!(table.get("Acropora"), Some(SymbiontState::Symbiotic));
        assert_eq!(table.get("Caryophyllia"), Some(SymbiontState::Asymbiotic));
        assert_eq!(table.get("Porites"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_overwrites() {
        let mut table = TraitTable::new();
        table.insert("Acropora", SymbiontState::Asymbiotic);
        table.insert("Acropora", SymbiontState::Symbiotic);
        assert_eq!(table.get("Acropora"), Some(SymbiontState::Symbiotic));
        assert_eq!(table.len(), 1);
    }
}
