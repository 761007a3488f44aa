//! Occurrence database client and table parsing
//!
//! Talks to a PaleoDB-style API (`/occs/list.csv`). Parsing is deliberately
//! lenient: the upstream schema gains columns over time, and malformed
//! numeric fields are reported as nulls for the cleaner to drop rather than
//! failing the whole download.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::time::Duration;
use tethys_core::{Occurrence, TethysError};
use tracing::debug;

/// Cap on the response body; the full coral occurrence table is ~50MB
const MAX_BODY_BYTES: u64 = 500 * 1024 * 1024;

/// Query parameters for an occurrence download
#[derive(Debug, Clone)]
pub struct OccurrenceQuery {
    /// Clade to download, matched against accepted names (e.g. "Scleractinia")
    pub base_name: String,
    /// Youngest age bound in Ma
    pub min_ma: f64,
    /// Oldest age bound in Ma
    pub max_ma: f64,
}

/// Blocking HTTP client for the occurrence database
pub struct PbdbClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl PbdbClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("tethys/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of the occurrence listing for a query
    pub fn occurrence_url(&self, query: &OccurrenceQuery) -> String {
        format!(
            "{}/occs/list.csv?base_name={}&min_ma={}&max_ma={}&show=coords,class,ident",
            self.base_url, query.base_name, query.min_ma, query.max_ma
        )
    }

    /// Download the raw occurrence CSV for a query
    pub fn fetch_occurrence_csv(&self, query: &OccurrenceQuery) -> Result<String> {
        let url = self.occurrence_url(query);
        debug!(url = %url, "requesting occurrence table");

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("[{elapsed_precise}] {spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Downloading occurrences for {}", query.base_name));
        pb.enable_steady_tick(Duration::from_millis(100));

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch occurrences for {}", query.base_name))?;

        if !response.status().is_success() {
            return Err(TethysError::Network(format!(
                "occurrence database returned status {} for {}",
                response.status(),
                query.base_name
            ))
            .into());
        }

        let mut body = String::new();
        response.take(MAX_BODY_BYTES).read_to_string(&mut body)?;

        pb.finish_and_clear();
        Ok(body)
    }
}

/// Parse an occurrence CSV into records.
///
/// Columns are located by header name; unknown columns are ignored and
/// missing or malformed values become `None`.
pub fn parse_occurrences(csv_text: &str) -> Result<Vec<Occurrence>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .context("occurrence table has no header row")?
        .clone();
    let col = |name: &str| headers.iter().position(|h| h == name);

    let occurrence_no = col("occurrence_no");
    let collection_no = col("collection_no");
    let genus = col("genus");
    let order = col("order");
    let lng = col("lng");
    let lat = col("lat");
    let max_ma = col("max_ma");
    let min_ma = col("min_ma");
    let accepted_rank = col("accepted_rank");

    if occurrence_no.is_none() || collection_no.is_none() {
        return Err(TethysError::Parse(
            "occurrence table is missing the occurrence_no/collection_no columns".to_string(),
        )
        .into());
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("failed to read occurrence row")?;

        let get = |idx: Option<usize>| idx.and_then(|i| row.get(i)).filter(|v| !v.is_empty());
        let get_f64 = |idx: Option<usize>| get(idx).and_then(|v| v.parse::<f64>().ok());
        let get_u64 = |idx: Option<usize>| get(idx).and_then(|v| v.parse::<u64>().ok());

        // Identity columns are required per row too; skip fragments
        let (Some(occ_no), Some(coll_no)) = (get_u64(occurrence_no), get_u64(collection_no))
        else {
            continue;
        };

        records.push(Occurrence {
            occurrence_no: occ_no,
            collection_no: coll_no,
            genus: get(genus).map(str::to_string),
            order: get(order).map(str::to_string),
            lng: get_f64(lng),
            lat: get_f64(lat),
            max_ma: get_f64(max_ma),
            min_ma: get_f64(min_ma),
            accepted_rank: get(accepted_rank).map(str::to_string),
        });
    }

    debug!(records = records.len(), "parsed occurrence table");
    Ok(records)
}
