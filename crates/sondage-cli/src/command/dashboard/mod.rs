use std::path::PathBuf;

use crate::{config::Config, tui::Tui};

use self::app::DashboardApp;

mod app;
mod form;
mod view;

#[derive(Default, Debug, Clone, clap::Args)]
pub struct DashboardArg {
    /// Data file (CSV or XLSX) to open on start
    file: Option<PathBuf>,
}

pub fn run(arg: &DashboardArg, config: &Config) -> anyhow::Result<()> {
    let DashboardArg { file } = arg;

    let mut app = DashboardApp::new(config.session_config(), config.output_dir.clone());
    if let Some(file) = file {
        app.open(file);
    }
    tracing::info!(output_dir = %config.output_dir.display(), "dashboard started");
    Tui::new().run(&mut app)?;

    Ok(())
}
