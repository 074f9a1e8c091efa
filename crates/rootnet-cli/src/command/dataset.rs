use std::path::PathBuf;

use super::DatasetArg;
use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DatasetCommandArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DatasetCommandArg) -> anyhow::Result<()> {
    let records = arg.dataset.load()?;
    for record in &records {
        tracing::debug!(
            name = %record.name,
            length = record.length,
            n_segments = record.n_segments,
            segment_length = record.segment_length(),
            "record"
        );
    }
    util::write_report(&records, arg.output.as_deref())
}
