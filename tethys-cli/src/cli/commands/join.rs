use super::fetch::{resolve_cache_dir, OCCURRENCE_DATASET, OCCURRENCE_FILE, TRAIT_DATASET, TRAIT_FILE};
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::fs;
use std::path::PathBuf;
use tethys_core::{Config, StageTable};
use tethys_data::{
    load_trait_table, parse_occurrences, DatasetCache, DatasetKey, GwsClient, RasterSeries,
};
use tethys_paleo::{run_pipeline, write_joined_csv, CleanOptions};

#[derive(Args)]
pub struct JoinArgs {
    /// Occurrence CSV file; defaults to the cached dataset
    #[arg(long, value_name = "FILE")]
    pub occurrences: Option<PathBuf>,

    /// Trait table CSV file; defaults to the cached dataset
    #[arg(long, value_name = "FILE")]
    pub traits: Option<PathBuf>,

    /// Raster series manifest (JSON)
    #[arg(long, value_name = "FILE")]
    pub rasters: PathBuf,

    /// Cache version to read when no explicit files are given
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// Output path for the joined table
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

pub fn run(args: JoinArgs, config: &Config) -> Result<()> {
    let cache = DatasetCache::new(resolve_cache_dir(config));

    // Core datasets; a missing one is fatal and names the resource
    let occurrence_path = match &args.occurrences {
        Some(path) => path.clone(),
        None => {
            let version = cached_version(&args.version, &cache, OCCURRENCE_DATASET)?;
            cache
                .get_offline(&DatasetKey::new(OCCURRENCE_DATASET, &version), OCCURRENCE_FILE)?
                .0
        }
    };
    let trait_path = match &args.traits {
        Some(path) => path.clone(),
        None => {
            let version = cached_version(&args.version, &cache, TRAIT_DATASET)?;
            cache
                .get_offline(&DatasetKey::new(TRAIT_DATASET, &version), TRAIT_FILE)?
                .0
        }
    };

    let occurrence_csv = fs::read_to_string(&occurrence_path)
        .with_context(|| format!("Failed to read occurrence table: {}", occurrence_path.display()))?;
    let raw = parse_occurrences(&occurrence_csv)?;
    let (traits, _) = load_trait_table(&trait_path)?;
    let series = RasterSeries::load(&args.rasters)?;

    let table = StageTable::ics();
    let rotator = GwsClient::new(
        &config.data.rotation_base_url,
        &config.data.rotation_model,
        config.data.http_timeout_secs,
    )?;

    let opts = CleanOptions {
        taxon: if config.pipeline.taxon.is_empty() {
            None
        } else {
            Some(config.pipeline.taxon.clone())
        },
        max_age_ma: config.pipeline.max_age_ma,
        min_age_ma: config.pipeline.min_age_ma,
    };

    let output = run_pipeline(&raw, &traits, &table, &series, &rotator, &opts);

    let out_path = args.out.unwrap_or_else(|| {
        PathBuf::from(&config.output.dir).join("occurrences_joined.csv")
    });
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    write_joined_csv(&output.records, &out_path)?;

    let s = &output.summary;
    println!("{} {}", "Joined table:".green().bold(), out_path.display());
    println!("  raw occurrences     {}", s.raw);
    println!("  after cleaning      {}", s.cleaned);
    println!("  stage-binned        {} ({} unsupported ages)", s.binned, s.unsupported_age);
    println!("  unique collections  {}", s.collections);
    println!("  reconstructed       {}", s.reconstructed);
    println!("  with temperature    {}", s.sampled);

    Ok(())
}

/// Pick the cache version: explicit flag, else the single cached version,
/// else the lexically greatest (dates sort chronologically).
fn cached_version(
    requested: &Option<String>,
    cache: &DatasetCache,
    dataset: &str,
) -> Result<String> {
    if let Some(version) = requested {
        return Ok(version.clone());
    }

    let dir = cache.root().join(dataset);
    let mut versions: Vec<String> = fs::read_dir(&dir)
        .with_context(|| {
            format!(
                "dataset '{}' is not in the local cache at {}; run `tethys fetch` first",
                dataset,
                cache.root().display()
            )
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    versions.sort();

    versions.pop().with_context(|| {
        format!(
            "dataset '{}' has no cached versions under {}",
            dataset,
            dir.display()
        )
    })
}
