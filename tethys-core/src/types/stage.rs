//! Geological stage reference table
//!
//! All temporal joins in the pipeline discretize onto named ICS stages. The
//! table is ordered oldest first, so a larger `StageId` is closer to the
//! present and first/last appearance datums are plain min/max over indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index into the stage reference table - newtype pattern for type safety
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct StageId(pub u16);

impl StageId {
    pub fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for StageId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<StageId> for u16 {
    fn from(id: StageId) -> Self {
        id.0
    }
}

/// A named geological time interval
///
/// Ages are in Ma before present. A stage spans the half-open interval
/// `[top_ma, bottom_ma)`: `top_ma` is the younger boundary, `bottom_ma` the
/// older one. The half-open convention means an age exactly on a shared
/// boundary belongs to the older of the two stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    /// Geological system (period) the stage belongs to
    pub system: String,
    pub top_ma: f64,
    pub bottom_ma: f64,
}

impl Stage {
    /// Interval midpoint in Ma
    pub fn mid_ma(&self) -> f64 {
        (self.top_ma + self.bottom_ma) / 2.0
    }

    /// Whether an age in Ma falls inside this stage's `[top_ma, bottom_ma)` interval
    pub fn contains(&self, age_ma: f64) -> bool {
        age_ma >= self.top_ma && age_ma < self.bottom_ma
    }

    /// Interval duration in Ma
    pub fn duration_ma(&self) -> f64 {
        self.bottom_ma - self.top_ma
    }
}

/// Ordered, contiguous table of geological stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTable {
    stages: Vec<Stage>,
}

impl StageTable {
    /// Build the standard ICS Phanerozoic table (Fortunian through Meghalayan)
    pub fn ics() -> Self {
        let stages = ICS_STAGES
            .iter()
            .map(|&(name, system, top_ma, bottom_ma)| Stage {
                name: name.to_string(),
                system: system.to_string(),
                top_ma,
                bottom_ma,
            })
            .collect();
        Self { stages }
    }

    /// Build a table from explicit stages; they must be ordered oldest first
    /// and contiguous (each top equals the next stage's bottom)
    pub fn from_stages(stages: Vec<Stage>) -> Self {
        debug_assert!(stages
            .windows(2)
            .all(|w| (w[0].top_ma - w[1].bottom_ma).abs() < 1e-9));
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StageId, &Stage)> {
        self.stages
            .iter()
            .enumerate()
            .map(|(i, s)| (StageId(i as u16), s))
    }

    /// Find the stage whose interval contains the given age midpoint.
    ///
    /// Returns `None` for ages older than the base of the oldest stage or
    /// younger than the top of the youngest one. Boundary ages resolve to
    /// the older stage through the half-open interval convention.
    pub fn bin_age(&self, age_ma: f64) -> Option<StageId> {
        if !age_ma.is_finite() || age_ma < 0.0 {
            return None;
        }
        self.stages
            .iter()
            .position(|s| s.contains(age_ma))
            .map(|i| StageId(i as u16))
    }

    /// Look a stage up by name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Option<StageId> {
        self.stages
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
            .map(|i| StageId(i as u16))
    }

    /// Midpoints of every stage, in table order
    pub fn midpoints(&self) -> Vec<f64> {
        self.stages.iter().map(|s| s.mid_ma()).collect()
    }
}

/// ICS chronostratigraphic chart, Phanerozoic stages, oldest first.
/// Columns: name, system, top (Ma), bottom (Ma).
const ICS_STAGES: &[(&str, &str, f64, f64)] = &[
    ("Fortunian", "Cambrian", 529.0, 541.0),
    ("Stage 2", "Cambrian", 521.0, 529.0),
    ("Stage 3", "Cambrian", 514.0, 521.0),
    ("Stage 4", "Cambrian", 509.0, 514.0),
    ("Wuliuan", "Cambrian", 504.5, 509.0),
    ("Drumian", "Cambrian", 500.5, 504.5),
    ("Guzhangian", "Cambrian", 497.0, 500.5),
    ("Paibian", "Cambrian", 494.0, 497.0),
    ("Jiangshanian", "Cambrian", 489.5, 494.0),
    ("Stage 10", "Cambrian", 485.4, 489.5),
    ("Tremadocian", "Ordovician", 477.7, 485.4),
    ("Floian", "Ordovician", 470.0, 477.7),
    ("Dapingian", "Ordovician", 467.3, 470.0),
    ("Darriwilian", "Ordovician", 458.4, 467.3),
    ("Sandbian", "Ordovician", 453.0, 458.4),
    ("Katian", "Ordovician", 445.2, 453.0),
    ("Hirnantian", "Ordovician", 443.8, 445.2),
    ("Rhuddanian", "Silurian", 440.8, 443.8),
    ("Aeronian", "Silurian", 438.5, 440.8),
    ("Telychian", "Silurian", 433.4, 438.5),
    ("Sheinwoodian", "Silurian", 430.5, 433.4),
    ("Homerian", "Silurian", 427.4, 430.5),
    ("Gorstian", "Silurian", 425.6, 427.4),
    ("Ludfordian", "Silurian", 423.0, 425.6),
    ("Pridoli", "Silurian", 419.2, 423.0),
    ("Lochkovian", "Devonian", 410.8, 419.2),
    ("Pragian", "Devonian", 407.6, 410.8),
    ("Emsian", "Devonian", 393.3, 407.6),
    ("Eifelian", "Devonian", 387.7, 393.3),
    ("Givetian", "Devonian", 382.7, 387.7),
    ("Frasnian", "Devonian", 372.2, 382.7),
    ("Famennian", "Devonian", 358.9, 372.2),
    ("Tournaisian", "Carboniferous", 346.7, 358.9),
    ("Visean", "Carboniferous", 330.9, 346.7),
    ("Serpukhovian", "Carboniferous", 323.2, 330.9),
    ("Bashkirian", "Carboniferous", 315.2, 323.2),
    ("Moscovian", "Carboniferous", 307.0, 315.2),
    ("Kasimovian", "Carboniferous", 303.7, 307.0),
    ("Gzhelian", "Carboniferous", 298.9, 303.7),
    ("Asselian", "Permian", 293.52, 298.9),
    ("Sakmarian", "Permian", 290.1, 293.52),
    ("Artinskian", "Permian", 283.5, 290.1),
    ("Kungurian", "Permian", 273.01, 283.5),
    ("Roadian", "Permian", 266.9, 273.01),
    ("Wordian", "Permian", 264.28, 266.9),
    ("Capitanian", "Permian", 259.51, 264.28),
    ("Wuchiapingian", "Permian", 254.14, 259.51),
    ("Changhsingian", "Permian", 251.902, 254.14),
    ("Induan", "Triassic", 251.2, 251.902),
    ("Olenekian", "Triassic", 247.2, 251.2),
    ("Anisian", "Triassic", 242.0, 247.2),
    ("Ladinian", "Triassic", 237.0, 242.0),
    ("Carnian", "Triassic", 227.0, 237.0),
    ("Norian", "Triassic", 208.5, 227.0),
    ("Rhaetian", "Triassic", 201.3, 208.5),
    ("Hettangian", "Jurassic", 199.3, 201.3),
    ("Sinemurian", "Jurassic", 190.8, 199.3),
    ("Pliensbachian", "Jurassic", 182.7, 190.8),
    ("Toarcian", "Jurassic", 174.1, 182.7),
    ("Aalenian", "Jurassic", 170.3, 174.1),
    ("Bajocian", "Jurassic", 168.3, 170.3),
    ("Bathonian", "Jurassic", 166.1, 168.3),
    ("Callovian", "Jurassic", 163.5, 166.1),
    ("Oxfordian", "Jurassic", 157.3, 163.5),
    ("Kimmeridgian", "Jurassic", 152.1, 157.3),
    ("Tithonian", "Jurassic", 145.0, 152.1),
    ("Berriasian", "Cretaceous", 139.8, 145.0),
    ("Valanginian", "Cretaceous", 132.9, 139.8),
    ("Hauterivian", "Cretaceous", 129.4, 132.9),
    ("Barremian", "Cretaceous", 125.0, 129.4),
    ("Aptian", "Cretaceous", 113.0, 125.0),
    ("Albian", "Cretaceous", 100.5, 113.0),
    ("Cenomanian", "Cretaceous", 93.9, 100.5),
    ("Turonian", "Cretaceous", 89.8, 93.9),
    ("Coniacian", "Cretaceous", 86.3, 89.8),
    ("Santonian", "Cretaceous", 83.6, 86.3),
    ("Campanian", "Cretaceous", 72.1, 83.6),
    ("Maastrichtian", "Cretaceous", 66.0, 72.1),
    ("Danian", "Paleogene", 61.6, 66.0),
    ("Selandian", "Paleogene", 59.2, 61.6),
    ("Thanetian", "Paleogene", 56.0, 59.2),
    ("Ypresian", "Paleogene", 47.8, 56.0),
    ("Lutetian", "Paleogene", 41.2, 47.8),
    ("Bartonian", "Paleogene", 37.71, 41.2),
    ("Priabonian", "Paleogene", 33.9, 37.71),
    ("Rupelian", "Paleogene", 27.82, 33.9),
    ("Chattian", "Paleogene", 23.03, 27.82),
    ("Aquitanian", "Neogene", 20.44, 23.03),
    ("Burdigalian", "Neogene", 15.98, 20.44),
    ("Langhian", "Neogene", 13.82, 15.98),
    ("Serravallian", "Neogene", 11.63, 13.82),
    ("Tortonian", "Neogene", 7.246, 11.63),
    ("Messinian", "Neogene", 5.333, 7.246),
    ("Zanclean", "Neogene", 3.6, 5.333),
    ("Piacenzian", "Neogene", 2.58, 3.6),
    ("Gelasian", "Quaternary", 1.8, 2.58),
    ("Calabrian", "Quaternary", 0.774, 1.8),
    ("Chibanian", "Quaternary", 0.129, 0.774),
    ("Upper Pleistocene", "Quaternary", 0.0117, 0.129),
    ("Greenlandian", "Quaternary", 0.0082, 0.0117),
    ("Northgrippian", "Quaternary", 0.0042, 0.0082),
    ("Meghalayan", "Quaternary", 0.0, 0.0042),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let table = StageTable::ics();
        assert_eq!(table.len(), 102);

        let (first_id, first) = table.iter().next().unwrap();
        assert_eq!(first_id, StageId(0));
        assert_eq!(first.name, "Fortunian");

        let (_, last) = table.iter().last().unwrap();
        assert_eq!(last.name, "Meghalayan");
        assert_eq!(last.top_ma, 0.0);
    }

    #[test]
    fn test_table_is_contiguous_and_ordered() {
        let table = StageTable::ics();
        for (id, stage) in table.iter() {
            assert!(stage.bottom_ma > stage.top_ma, "{} inverted", stage.name);
            if let Some(next) = table.get(StageId(id.0 + 1)) {
                assert!(
                    (stage.top_ma - next.bottom_ma).abs() < 1e-9,
                    "gap between {} and {}",
                    stage.name,
                    next.name
                );
            }
        }
    }

    #[test]
    fn test_bin_age_midpoint_containment() {
        let table = StageTable::ics();

        // 150 Ma is inside the Tithonian (145.0 - 152.1)
        let id = table.bin_age(150.0).unwrap();
        assert_eq!(table.get(id).unwrap().name, "Tithonian");

        // 100 Ma is inside the Cenomanian (93.9 - 100.5)
        let id = table.bin_age(100.0).unwrap();
        assert_eq!(table.get(id).unwrap().name, "Cenomanian");
    }

    #[test]
    fn test_bin_age_boundary_goes_to_older_stage() {
        let table = StageTable::ics();

        // 66.0 is the Maastrichtian/Danian boundary; the older stage wins
        let id = table.bin_age(66.0).unwrap();
        assert_eq!(table.get(id).unwrap().name, "Maastrichtian");

        // 201.3 is the Rhaetian/Hettangian boundary
        let id = table.bin_age(201.3).unwrap();
        assert_eq!(table.get(id).unwrap().name, "Rhaetian");
    }

    #[test]
    fn test_bin_age_unsupported() {
        let table = StageTable::ics();

        // Precambrian ages have no stage assignment
        assert_eq!(table.bin_age(600.0), None);
        assert_eq!(table.bin_age(541.0), None);
        assert_eq!(table.bin_age(f64::NAN), None);
        assert_eq!(table.bin_age(-1.0), None);
    }

    #[test]
    fn test_bin_age_present_day() {
        let table = StageTable::ics();
        let id = table.bin_age(0.0).unwrap();
        assert_eq!(table.get(id).unwrap().name, "Meghalayan");
    }

    #[test]
    fn test_find_by_name() {
        let table = StageTable::ics();
        let id = table.find_by_name("maastrichtian").unwrap();
        assert_eq!(table.get(id).unwrap().system, "Cretaceous");
        assert_eq!(table.find_by_name("Ediacaran"), None);
    }

    #[test]
    fn test_midpoint() {
        let stage = Stage {
            name: "Test".to_string(),
            system: "Test".to_string(),
            top_ma: 100.0,
            bottom_ma: 110.0,
        };
        assert_eq!(stage.mid_ma(), 105.0);
        assert_eq!(stage.duration_ma(), 10.0);
    }
}
