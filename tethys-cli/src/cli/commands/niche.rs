use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tethys_core::{Config, StageTable, SymbiontState};
use tethys_niche::{lifetime_niches, rank_sum_test, stage_niches, windowed_trend};
use tethys_paleo::read_joined_csv;

#[derive(Args)]
pub struct NicheArgs {
    /// Joined table produced by `tethys join`
    #[arg(long, value_name = "FILE")]
    pub joined: Option<PathBuf>,

    /// Directory for the aggregate tables
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Skip the cohort rank-sum comparison
    #[arg(long)]
    pub no_test: bool,
}

pub fn run(args: NicheArgs, config: &Config) -> Result<()> {
    let joined_path = args
        .joined
        .unwrap_or_else(|| PathBuf::from(&config.output.dir).join("occurrences_joined.csv"));
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let records = read_joined_csv(&joined_path)?;
    let table = StageTable::ics();

    let per_stage = stage_niches(&records);
    let lifetimes = lifetime_niches(&records);
    let trend = windowed_trend(&lifetimes, &table);

    write_table(&out_dir.join("stage_niche.csv"), &per_stage)?;
    write_table(&out_dir.join("lifetime_niche.csv"), &lifetimes)?;
    write_table(&out_dir.join("windowed_trend.csv"), &trend)?;

    println!("{} {}", "Aggregates:".green().bold(), out_dir.display());
    println!("  stage niches        {}", per_stage.len());
    println!("  lifetime niches     {}", lifetimes.len());
    println!("  trend rows          {}", trend.len());

    if !args.no_test {
        let z: Vec<f64> = lifetimes
            .iter()
            .filter(|n| n.ecology == SymbiontState::Symbiotic)
            .map(|n| n.median_temp)
            .collect();
        let az: Vec<f64> = lifetimes
            .iter()
            .filter(|n| n.ecology == SymbiontState::Asymbiotic)
            .map(|n| n.median_temp)
            .collect();

        let test = rank_sum_test(&z, &az)
            .context("cohort comparison of lifetime medians is not testable")?;

        println!();
        println!(
            "{} z (n={}) vs az (n={})",
            "Rank-sum:".green().bold(),
            test.n1,
            test.n2
        );
        println!("  U = {:.1}, z = {:.3}, p = {:.4e}", test.u, test.z, test.p_value);
        if test.p_value < 0.05 {
            println!("  cohort thermal niches differ at the 0.05 level");
        } else {
            println!("  no difference detectable at the 0.05 level");
        }
    }

    Ok(())
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create table: {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
