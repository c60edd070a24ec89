use std::{io, path::PathBuf};

use sondage_analysis::describe;

use crate::{config::Config, util};

#[derive(Debug, Clone, clap::Args)]
pub struct PreviewArg {
    /// Data file (CSV or XLSX)
    file: PathBuf,
    /// Number of rows to print [default: from config]
    #[clap(long)]
    rows: Option<usize>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DescribeArg {
    /// Data file (CSV or XLSX)
    file: PathBuf,
}

pub fn run_preview(arg: &PreviewArg, config: &Config) -> anyhow::Result<()> {
    let PreviewArg { file, rows } = arg;

    let table = util::load_table(file)?;
    let head = describe::preview_head(&table, rows.unwrap_or(config.preview_rows));
    util::write_table(&mut io::stdout().lock(), &head)?;

    Ok(())
}

pub fn run_describe(arg: &DescribeArg) -> anyhow::Result<()> {
    let DescribeArg { file } = arg;

    let table = util::load_table(file)?;
    util::write_table(&mut io::stdout().lock(), &describe::describe(&table))?;

    Ok(())
}
