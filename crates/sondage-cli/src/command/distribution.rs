use std::{io, path::PathBuf};

use anyhow::bail;
use sondage_analysis::distribution::Distribution;

use crate::{config::Config, util};

#[derive(Debug, Clone, clap::Args)]
pub struct DistributionArg {
    /// Data file (CSV or XLSX)
    file: PathBuf,
    /// Categorical columns to count, comma separated
    #[clap(long, value_delimiter = ',', required = true)]
    columns: Vec<String>,
    /// Save each frequency table as `repartition_<column>.csv`
    #[clap(long)]
    export: bool,
}

pub fn run(arg: &DistributionArg, config: &Config) -> anyhow::Result<()> {
    let DistributionArg {
        file,
        columns,
        export,
    } = arg;

    let table = util::load_table(file)?;
    let categorical = table.categorical_columns();
    let mut out = io::stdout().lock();
    for column in columns {
        if !categorical.contains(&column.as_str()) {
            bail!("'{column}' is not a categorical column of {}", file.display());
        }
        let Some(distribution) = Distribution::of(&table, column) else {
            bail!("Unknown column: {column}");
        };
        util::write_table(&mut out, &distribution.to_table())?;
        if *export {
            let path = util::save_export(&distribution.export()?, &config.output_dir)?;
            eprintln!("Saved {}", path.display());
        }
    }

    Ok(())
}
