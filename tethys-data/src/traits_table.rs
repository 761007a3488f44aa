//! Genus-level ecological trait table
//!
//! A two-column CSV (`genus,ecology`) mapping each genus to its cohort.
//! Rows with labels the parser does not recognize are dropped and counted;
//! the caller decides whether the drop rate is acceptable.

use anyhow::{Context, Result};
use std::path::Path;
use tethys_core::{SymbiontState, TethysError, TraitTable};
use tracing::warn;

/// Parse trait-table CSV text. Returns the table and the number of rows
/// dropped for unrecognized ecology labels.
pub fn parse_trait_table(csv_text: &str) -> Result<(TraitTable, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .context("trait table has no header row")?
        .clone();
    let genus_col = headers.iter().position(|h| h == "genus");
    let ecology_col = headers
        .iter()
        .position(|h| h == "ecology" || h == "symbiosis");

    let (Some(genus_col), Some(ecology_col)) = (genus_col, ecology_col) else {
        return Err(TethysError::Parse(
            "trait table is missing the genus/ecology columns".to_string(),
        )
        .into());
    };

    let mut table = TraitTable::new();
    let mut dropped = 0usize;
    for row in reader.records() {
        let row = row.context("failed to read trait table row")?;
        let genus = row.get(genus_col).unwrap_or("").trim();
        let label = row.get(ecology_col).unwrap_or("");

        if genus.is_empty() {
            dropped += 1;
            continue;
        }
        match SymbiontState::parse(label) {
            Some(state) => table.insert(genus, state),
            None => {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!(dropped, "trait table rows dropped for missing genus or unknown ecology label");
    }
    if table.is_empty() {
        return Err(TethysError::Parse("trait table contains no usable rows".to_string()).into());
    }
    Ok((table, dropped))
}

/// Load a trait table from a local CSV file
pub fn load_trait_table(path: &Path) -> Result<(TraitTable, usize)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trait table: {}", path.display()))?;
    parse_trait_table(&text)
}

/// Download trait-table CSV text from a URL
pub fn fetch_trait_table_csv(url: &str, timeout_secs: u64) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("tethys/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch trait table from {}", url))?;
    if !response.status().is_success() {
        return Err(TethysError::Network(format!(
            "trait table source returned status {} for {}",
            response.status(),
            url
        ))
        .into());
    }
    Ok(response.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trait_table() {
        let csv = "\
genus,ecology
Acropora,z
Caryophyllia,az
Porites,Zooxanthellate
Unknownia,mixed
,z
";
        let (table, dropped) = parse_trait_table(csv).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(dropped, 2);
        assert_eq!(table.get("Acropora"), Some(SymbiontState::Symbiotic));
        assert_eq!(table.get("Caryophyllia"), Some(SymbiontState::Asymbiotic));
        assert_eq!(table.get("Porites"), Some(SymbiontState::Symbiotic));
        assert_eq!(table.get("Unknownia"), None);
    }

    #[test]
    fn test_symbiosis_header_alias() {
        let csv = "genus,symbiosis\nFavia,z\n";
        let (table, dropped) = parse_trait_table(csv).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(table.get("Favia"), Some(SymbiontState::Symbiotic));
    }

    #[test]
    fn test_missing_columns() {
        let err = parse_trait_table("name,state\nA,z\n").unwrap_err();
        assert!(err.to_string().contains("genus/ecology"));
    }

    #[test]
    fn test_all_rows_unusable() {
        let err = parse_trait_table("genus,ecology\nA,??\n").unwrap_err();
        assert!(err.to_string().contains("no usable rows"));
    }
}
