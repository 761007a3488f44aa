use anyhow::{bail, Result};
use clap::Args;
use colored::*;
use tethys_core::{Config, Provenance};
use tethys_data::{
    fetch_trait_table_csv, parse_occurrences, parse_trait_table, DatasetCache, DatasetKey,
    OccurrenceQuery, PbdbClient,
};

/// Dataset names used as cache keys
pub const OCCURRENCE_DATASET: &str = "pbdb_occurrences";
pub const TRAIT_DATASET: &str = "trait_table";
pub const OCCURRENCE_FILE: &str = "occurrences.csv";
pub const TRAIT_FILE: &str = "traits.csv";

#[derive(Args)]
pub struct FetchArgs {
    /// Clade to download occurrences for (defaults to the configured taxon)
    #[arg(long, value_name = "NAME")]
    pub taxon: Option<String>,

    /// Dataset version label; defaults to today's date so daily snapshots
    /// of the upstream database stay distinguishable
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// URL of the genus trait table (CSV with genus,ecology columns)
    #[arg(long, value_name = "URL")]
    pub traits_url: Option<String>,

    /// Refetch even when the cache already holds this version
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: FetchArgs, config: &Config) -> Result<()> {
    if config.data.offline {
        bail!("cannot fetch in offline mode; unset data.offline or use the cache");
    }

    let cache = DatasetCache::new(resolve_cache_dir(config));
    let taxon = args.taxon.unwrap_or_else(|| config.pipeline.taxon.clone());
    let version = args
        .version
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    // Occurrence table
    let key = DatasetKey::new(OCCURRENCE_DATASET, &version);
    if args.force {
        cache.evict(&key)?;
    }

    let client = PbdbClient::new(&config.data.occurrence_base_url, config.data.http_timeout_secs)?;
    let query = OccurrenceQuery {
        base_name: taxon.clone(),
        min_ma: config.pipeline.min_age_ma,
        max_ma: config.pipeline.max_age_ma,
    };

    let (path, prov) = cache.get_or_fetch(&key, OCCURRENCE_FILE, || {
        let url = client.occurrence_url(&query);
        let body = client.fetch_occurrence_csv(&query)?;
        let records = parse_occurrences(&body)?;
        let prov = Provenance::new(OCCURRENCE_DATASET, &version, url)
            .with_variable(&taxon)
            .with_record_count(records.len());
        Ok((body.into_bytes(), prov))
    })?;

    println!(
        "{} {} ({} records) -> {}",
        "Cached".green().bold(),
        OCCURRENCE_DATASET,
        prov.record_count.unwrap_or(0),
        path.display()
    );

    // Trait table, when a source is given
    if let Some(traits_url) = &args.traits_url {
        let key = DatasetKey::new(TRAIT_DATASET, &version);
        if args.force {
            cache.evict(&key)?;
        }

        let (path, prov) = cache.get_or_fetch(&key, TRAIT_FILE, || {
            let body = fetch_trait_table_csv(traits_url, config.data.http_timeout_secs)?;
            let (table, _) = parse_trait_table(&body)?;
            let prov = Provenance::new(TRAIT_DATASET, &version, traits_url)
                .with_record_count(table.len());
            Ok((body.into_bytes(), prov))
        })?;

        println!(
            "{} {} ({} genera) -> {}",
            "Cached".green().bold(),
            TRAIT_DATASET,
            prov.record_count.unwrap_or(0),
            path.display()
        );
    }

    Ok(())
}

/// Cache directory from config, falling back to the standard location
pub fn resolve_cache_dir(config: &Config) -> std::path::PathBuf {
    config
        .data
        .cache_dir
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(tethys_core::tethys_cache_dir)
}
