use anyhow::Result;
use clap::Args;
use tethys_core::StageTable;

#[derive(Args)]
pub struct StagesArgs {
    /// Restrict the listing to one geological system (e.g. "Jurassic")
    #[arg(long, value_name = "NAME")]
    pub system: Option<String>,
}

pub fn run(args: StagesArgs) -> Result<()> {
    let table = StageTable::ics();

    println!(
        "{:>5}  {:<18} {:<14} {:>9} {:>9} {:>9}",
        "index", "stage", "system", "bottom", "top", "mid"
    );
    for (id, stage) in table.iter() {
        if let Some(system) = &args.system {
            if !stage.system.eq_ignore_ascii_case(system) {
                continue;
            }
        }
        println!(
            "{:>5}  {:<18} {:<14} {:>9.3} {:>9.3} {:>9.3}",
            id,
            stage.name,
            stage.system,
            stage.bottom_ma,
            stage.top_ma,
            stage.mid_ma()
        );
    }

    Ok(())
}
