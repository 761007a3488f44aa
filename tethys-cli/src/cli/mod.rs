pub mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tethys_core::{load_config, Config};

#[derive(Parser)]
#[command(
    name = "tethys",
    version,
    about = "Thermal niche reconstruction for fossil occurrence data",
    long_about = "Tethys downloads fossil occurrence records and paleoclimate temperature \
                  reconstructions, aligns them onto a common stratigraphic and spatial frame, \
                  and produces the joined and aggregated tables used to compare the thermal \
                  niches of photosymbiotic and asymbiotic genera through time."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./tethys.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download occurrence and trait datasets into the local cache
    Fetch(commands::fetch::FetchArgs),

    /// Run the alignment pipeline and write the joined table
    Join(commands::join::JoinArgs),

    /// Aggregate the joined table into niche summaries and compare cohorts
    Niche(commands::niche::NicheArgs),

    /// Print the geological stage reference table
    Stages(commands::stages::StagesArgs),
}

impl Cli {
    /// Load the configuration: an explicit --config path, else ./tethys.toml
    /// when present, else defaults.
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        if let Some(path) = &self.config {
            return load_config(path)
                .with_context(|| format!("Failed to load config: {}", path.display()));
        }
        let default_path = PathBuf::from("tethys.toml");
        if default_path.exists() {
            return load_config(&default_path).context("Failed to load ./tethys.toml");
        }
        Ok(Config::default())
    }
}
