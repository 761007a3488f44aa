//! Provenance metadata attached to fetched datasets

use serde::{Deserialize, Serialize};

/// Where a cached dataset came from and when it was retrieved
///
/// Written as a JSON sidecar next to the cached file so that a cache
/// directory is self-describing and a run is attributable to exact dataset
/// versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub dataset: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Full URL (or local path) the bytes were retrieved from
    pub source: String,
    /// UTC timestamp of retrieval, YYYYMMDD_HHMMSS
    pub accessed_utc: String,
    /// Number of records parsed from the dataset, when tabular
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
}

impl Provenance {
    pub fn new(dataset: impl Into<String>, version: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            version: version.into(),
            variable: None,
            resolution: None,
            source: source.into(),
            accessed_utc: crate::system::generate_utc_timestamp(),
            record_count: None,
        }
    }

    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn with_record_count(mut self, count: usize) -> Self {
        self.record_count = Some(count);
        self
    }
}
