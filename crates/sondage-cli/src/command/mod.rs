use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::Config,
    logging::{self, LogTarget},
};

use self::{
    dashboard::DashboardArg,
    describe::{DescribeArg, PreviewArg},
    distribution::DistributionArg,
    poll::PollArg,
    sample::{SampleArg, StratifiedSampleArg},
    sample_size::SampleSizeArg,
    unique::UniqueArg,
};

mod dashboard;
mod describe;
mod distribution;
mod poll;
mod sample;
mod sample_size;
mod unique;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    global: GlobalArg,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Default, Debug, Clone, clap::Args)]
struct GlobalArg {
    /// Path to the configuration file (JSON format)
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Append logs to this file instead of stderr
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Directory where exported CSV files are written
    #[clap(long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Explore a data file in the terminal dashboard
    Dashboard(#[clap(flatten)] DashboardArg),
    /// Print the first rows of a data file
    Preview(#[clap(flatten)] PreviewArg),
    /// Print descriptive statistics of every column
    Describe(#[clap(flatten)] DescribeArg),
    /// Print the frequency table of categorical columns
    Distribution(#[clap(flatten)] DistributionArg),
    /// Print the distinct combinations of the selected columns
    Unique(#[clap(flatten)] UniqueArg),
    /// Compute the required sample size with Cochran's formula
    SampleSize(#[clap(flatten)] SampleSizeArg),
    /// Draw a simple random sample
    Sample(#[clap(flatten)] SampleArg),
    /// Draw a sample proportionally to the strata of a column
    StratifiedSample(#[clap(flatten)] StratifiedSampleArg),
    /// Answer the satisfaction poll
    Poll(#[clap(flatten)] PollArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let GlobalArg {
        config,
        log_file,
        output_dir,
    } = args.global;

    let config = Config::load(config.as_deref())?.with_overrides(output_dir, log_file);
    let mode = args
        .mode
        .unwrap_or(Mode::Dashboard(DashboardArg::default()));
    logging::init(&LogTarget::for_mode(
        matches!(mode, Mode::Dashboard(_)),
        config.log_file.as_deref(),
    ))?;

    match mode {
        Mode::Dashboard(arg) => dashboard::run(&arg, &config)?,
        Mode::Preview(arg) => describe::run_preview(&arg, &config)?,
        Mode::Describe(arg) => describe::run_describe(&arg)?,
        Mode::Distribution(arg) => distribution::run(&arg, &config)?,
        Mode::Unique(arg) => unique::run(&arg, &config)?,
        Mode::SampleSize(arg) => sample_size::run(&arg),
        Mode::Sample(arg) => sample::run_simple(&arg, &config)?,
        Mode::StratifiedSample(arg) => sample::run_stratified(&arg, &config)?,
        Mode::Poll(arg) => poll::run(&arg),
    }
    Ok(())
}
