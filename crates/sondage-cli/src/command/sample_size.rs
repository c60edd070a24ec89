use sondage_stats::cochran::SampleSizeParams;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub struct SampleSizeArg {
    /// Z score of the confidence level
    #[clap(long, default_value_t = 1.96)]
    z: f64,
    /// Estimated proportion, clamped to [0, 1]
    #[clap(long, default_value_t = 0.5)]
    p: f64,
    /// Margin of error, clamped to [0.001, 1]
    #[clap(long, default_value_t = 0.05)]
    e: f64,
    /// Population size (0 if infinite)
    #[clap(long, default_value_t = 0)]
    population: u64,
}

pub fn run(arg: &SampleSizeArg) {
    let &SampleSizeArg { z, p, e, population } = arg;

    let params = SampleSizeParams {
        z,
        p,
        e,
        population,
    }
    .clamped();
    let result = params.compute();
    tracing::debug!(?params, size = result.size, "sample size computed");
    println!("{}", util::sample_size_message(&result));
}
