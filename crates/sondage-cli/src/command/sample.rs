use std::{io, path::PathBuf};

use sondage_analysis::sampling::{self, Sample};

use crate::{config::Config, util};

#[derive(Debug, Clone, clap::Args)]
pub struct SampleArg {
    /// Data file (CSV or XLSX)
    file: PathBuf,
    /// Number of rows to draw [default: from config, capped by the row count]
    #[clap(long)]
    size: Option<usize>,
    /// Random seed [default: from config]
    #[clap(long)]
    seed: Option<u64>,
    /// Save the sample as `echantillon.csv`
    #[clap(long)]
    export: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StratifiedSampleArg {
    /// Data file (CSV or XLSX)
    file: PathBuf,
    /// Categorical column defining the strata
    #[clap(long)]
    column: String,
    /// Total number of rows to draw [default: from config, capped by the row count]
    #[clap(long)]
    size: Option<usize>,
    /// Random seed [default: from config]
    #[clap(long)]
    seed: Option<u64>,
    /// Save the sample as `echantillon_stratifie.csv`
    #[clap(long)]
    export: bool,
}

pub fn run_simple(arg: &SampleArg, config: &Config) -> anyhow::Result<()> {
    let SampleArg {
        file,
        size,
        seed,
        export,
    } = arg;

    let table = util::load_table(file)?;
    let size = size.unwrap_or_else(|| {
        sampling::default_size(table.row_count(), config.default_sample_size)
    });
    let sample = sampling::simple_random(&table, size, seed.unwrap_or(config.seed))?;

    print_sample(&sample, None, *export, config)
}

pub fn run_stratified(arg: &StratifiedSampleArg, config: &Config) -> anyhow::Result<()> {
    let StratifiedSampleArg {
        file,
        column,
        size,
        seed,
        export,
    } = arg;

    let table = util::load_table(file)?;
    let size = size.unwrap_or_else(|| {
        sampling::default_size(table.row_count(), config.default_sample_size)
    });
    let sample = sampling::stratified(&table, column, size, seed.unwrap_or(config.seed))?;
    for stratum in sample.strata() {
        eprintln!(
            "  {}: {} of {} rows",
            stratum.value, stratum.drawn, stratum.population
        );
    }

    print_sample(&sample, Some(column.as_str()), *export, config)
}

fn print_sample(
    sample: &Sample,
    column: Option<&str>,
    export: bool,
    config: &Config,
) -> anyhow::Result<()> {
    println!("{}", util::sample_message(sample, column));
    util::write_table(&mut io::stdout().lock(), sample.table())?;
    if export {
        let path = util::save_export(&sample.export()?, &config.output_dir)?;
        eprintln!("Saved {}", path.display());
    }
    Ok(())
}
