use std::path::PathBuf;

use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use reta_analysis::{
    predictor::{Predictor, PredictorConfig},
    split::SplitRatio,
};
use tracing::info;

use super::WindowArg;
use crate::util::Output;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    #[clap(flatten)]
    pub(super) window: WindowArg,
    /// Percentage of players used for training
    #[arg(long, default_value_t = 70)]
    train: u32,
    /// Percentage of players held out for testing
    #[arg(long, default_value_t = 30)]
    test: u32,
    /// Maximum number of Newton-Raphson iterations
    #[arg(long, default_value_t = 100)]
    iterations: usize,
    /// Seed for the train/test shuffle; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Report format: text, html or json
    #[arg(long, default_value = "text")]
    pub(super) format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let config = PredictorConfig {
        window: arg.window.window()?,
        split: SplitRatio::new(arg.train, arg.test)?,
        max_iterations: arg.iterations,
    };
    let store = arg.window.load_store()?;

    let mut rng = match arg.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_os_rng(),
    };
    let prediction = Predictor::new(config).run(&store, &mut rng)?;
    info!(
        accuracy = %format!("{:.2}", prediction.accuracy),
        outcome = %prediction.fit.outcome,
        "model fitted"
    );

    let mut output = Output::from_output_path(arg.output.clone())?;
    match arg.format {
        OutputFormat::Text => output.write_text(&prediction.to_text())?,
        OutputFormat::Html => output.write_text(&prediction.to_html())?,
        OutputFormat::Json => output.write_json(&prediction)?,
    }
    Ok(())
}
