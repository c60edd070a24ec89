use std::{io, path::PathBuf};

use anyhow::Context as _;
use sondage_analysis::unique;

use crate::{config::Config, util};

#[derive(Debug, Clone, clap::Args)]
pub struct UniqueArg {
    /// Data file (CSV or XLSX)
    file: PathBuf,
    /// Columns to combine, comma separated
    #[clap(long, value_delimiter = ',', required = true)]
    columns: Vec<String>,
    /// Save the combinations as `valeurs_uniques.csv`
    #[clap(long)]
    export: bool,
}

pub fn run(arg: &UniqueArg, config: &Config) -> anyhow::Result<()> {
    let UniqueArg {
        file,
        columns,
        export,
    } = arg;

    let table = util::load_table(file)?;
    let unique = unique::find_unique_combinations(&table, columns.as_slice())?
        .context("No column selected")?;

    println!("{}", util::unique_message(unique.len()));
    util::write_table(&mut io::stdout().lock(), unique.table())?;
    if *export {
        let path = util::save_export(&unique.export()?, &config.output_dir)?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}
