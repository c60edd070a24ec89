use sondage_analysis::poll::{PollChoice, PollResponse};

#[derive(Debug, Clone, clap::Args)]
pub struct PollArg {
    /// Your name
    #[clap(long, default_value = "")]
    name: String,
    /// Are you satisfied with the app? (yes, no, maybe)
    #[clap(long, default_value = "yes")]
    choice: PollChoice,
}

pub fn run(arg: &PollArg) {
    let PollArg { name, choice } = arg;

    let response = PollResponse::new(name.clone(), *choice);
    tracing::info!(%choice, "poll answered");
    println!("{}", response.acknowledge());
}
