use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rootnet_growth::params::DataRecord;

use self::{dataset::DatasetCommandArg, grow::GrowArg, sweep::SweepArg};
use crate::dataset::{self as data, DataFormat};

mod dataset;
mod grow;
mod sweep;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log every candidate evaluation
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Grow a single network and report it
    Grow(#[clap(flatten)] GrowArg),
    /// Sweep beta for every record and report the trade-off curves
    Sweep(#[clap(flatten)] SweepArg),
    /// Print the resolved dataset records
    Dataset(#[clap(flatten)] DatasetCommandArg),
}

/// Where the dataset records come from.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DatasetArg {
    /// Dataset file (JSON array of records, or CSV); built-in samples when omitted
    #[arg(long)]
    data: Option<PathBuf>,
    /// Format of the dataset file (json or csv); guessed from the extension when omitted
    #[arg(long)]
    format: Option<DataFormat>,
    /// Override the segment count of every record
    #[arg(long)]
    n_segments: Option<usize>,
}

impl DatasetArg {
    pub(crate) fn load(&self) -> anyhow::Result<Vec<DataRecord>> {
        let mut records = match &self.data {
            Some(path) => data::load_records(path, self.format)?,
            None => data::builtin_records(),
        };
        if let Some(n_segments) = self.n_segments {
            data::override_segments(&mut records, n_segments)?;
        }
        data::validate_records(&records)?;
        Ok(records)
    }
}

pub fn run(args: CommandArgs) -> anyhow::Result<()> {
    match args.mode {
        Mode::Grow(arg) => grow::run(&arg)?,
        Mode::Sweep(arg) => sweep::run(&arg)?,
        Mode::Dataset(arg) => dataset::run(&arg)?,
    }
    Ok(())
}
