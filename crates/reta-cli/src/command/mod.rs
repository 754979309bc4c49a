use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use reta_analysis::window::TimeWindow;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use self::{features::FeaturesArg, predict::PredictArg};
use crate::util::{self, parse_timestamp};

mod features;
mod predict;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug output, overriding RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fit a day-1 retention model and score it on held-out players
    Predict(#[clap(flatten)] PredictArg),
    /// Dump the extracted per-player features as JSON
    Features(#[clap(flatten)] FeaturesArg),
}

/// Event source and time window shared by all subcommands.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WindowArg {
    /// Event log JSON file
    #[arg(long)]
    events: PathBuf,
    /// Start of the window (inclusive), RFC 3339 or YYYY-MM-DD
    #[arg(long, value_parser = parse_timestamp)]
    begin: DateTime<Utc>,
    /// End of the window (exclusive), RFC 3339 or YYYY-MM-DD
    #[arg(long, value_parser = parse_timestamp)]
    end: DateTime<Utc>,
}

impl WindowArg {
    fn window(&self) -> anyhow::Result<TimeWindow> {
        Ok(TimeWindow::new(self.begin, self.end)?)
    }

    fn load_store(&self) -> anyhow::Result<reta_analysis::store::MemoryEventStore> {
        util::read_event_store(&self.events)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Predict(arg) => predict::run(&arg)?,
        Mode::Features(arg) => features::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
