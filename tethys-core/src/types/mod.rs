//! Shared domain types for the Tethys pipeline

pub mod ecology;
pub mod occurrence;
pub mod provenance;
pub mod stage;

pub use ecology::{SymbiontState, TraitTable};
pub use occurrence::{CleanOccurrence, CollectionKey, Occurrence};
pub use provenance::Provenance;
pub use stage::{Stage, StageId, StageTable};
