use std::path::PathBuf;

use reta_analysis::{features::extract_features, split::ClassCounts, store::EventStore as _};
use tracing::info;

use super::WindowArg;
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FeaturesArg {
    #[clap(flatten)]
    pub(super) window: WindowArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &FeaturesArg) -> anyhow::Result<()> {
    let window = arg.window.window()?;
    let store = arg.window.load_store()?;
    let events = store.query_events(window.begin(), window.end())?;
    let timed_events = store.query_timed_events(window.begin(), window.end())?;

    let features = extract_features(&window, &events, &timed_events);
    let counts = ClassCounts::of(&features);
    info!(
        players = counts.total(),
        retained = counts.retained,
        "extracted player features"
    );

    Output::from_output_path(arg.output.clone())?.write_json(&features)
}
