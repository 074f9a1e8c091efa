use std::path::PathBuf;

use anyhow::Context;
use rootnet_engine::{FieldMetadata, Network, NodeId};
use rootnet_evaluator::objective::ObjectiveValue;
use rootnet_growth::{
    growth_engine::{GrowthEngine, GrowthOutcome},
    observer::TracingObserver,
    params::{DataRecord, GrowthParams},
};
use serde::Serialize;

use super::DatasetArg;
use crate::{settings::SettingsArg, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GrowArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    settings: SettingsArg,
    /// Record to grow; the first record when omitted
    #[arg(long)]
    record: Option<String>,
    /// Weight of coverage against transport, strictly between 0 and 1
    #[arg(long, default_value_t = 0.5)]
    beta: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct GrowthReport {
    name: String,
    params: GrowthParams,
    objective: ObjectiveValue,
    history: Vec<ObjectiveValue>,
    /// Node ids from the root to the final tip.
    tip_path: Vec<NodeId>,
    network: Network,
    field: FieldMetadata,
}

impl GrowthReport {
    fn new(name: String, params: GrowthParams, outcome: GrowthOutcome) -> Self {
        let tip_path = outcome
            .network
            .path_from_root(outcome.network.last_node().id)
            .unwrap_or_default();
        Self {
            name,
            params,
            objective: outcome.objective,
            history: outcome.history,
            tip_path,
            field: outcome.field.metadata(),
            network: outcome.network,
        }
    }
}

pub(crate) fn run(arg: &GrowArg) -> anyhow::Result<()> {
    let settings = arg.settings.resolve()?;
    let records = arg.dataset.load()?;
    let record = select_record(&records, arg.record.as_deref())?;

    let params =
        GrowthParams::from_record(record, arg.beta, settings.radius, settings.unit_length);
    let engine = GrowthEngine::with_field_init(params, settings.field)
        .with_context(|| format!("Failed to set up growth for {}", record.name))?;
    let outcome = engine
        .run_with(arg.settings.mode(), &mut TracingObserver::new())
        .with_context(|| format!("Growth failed for {}", record.name))?;

    let report = GrowthReport::new(record.name.clone(), engine.params().clone(), outcome);
    util::write_report(&report, arg.output.as_deref())
}

fn select_record<'a>(records: &'a [DataRecord], name: Option<&str>) -> anyhow::Result<&'a DataRecord> {
    match name {
        Some(name) => records
            .iter()
            .find(|r| r.name == name)
            .with_context(|| format!("No record named {name:?} in the dataset")),
        None => records.first().context("The dataset is empty"),
    }
}

#[cfg(test)]
mod tests {
    use rootnet_growth::observer::NoopObserver;

    use super::*;
    use crate::dataset::builtin_records;

    #[test]
    fn test_report_follows_the_tip() {
        let params = GrowthParams::new("A", 0.5, 2.0, 3, 2.0);
        let outcome = GrowthEngine::new(params.clone())
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();
        let report = GrowthReport::new("A".to_owned(), params, outcome);

        assert_eq!(report.tip_path, (0..4).map(NodeId).collect::<Vec<_>>());
        assert_eq!(report.field.acquired_cells, 22);
        assert_eq!(report.history.len(), 3);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["tip_path"], serde_json::json!([0, 1, 2, 3]));
        assert_eq!(value["objective"]["coverage"], 22);
    }

    #[test]
    fn test_select_record() {
        let records = builtin_records();
        assert_eq!(select_record(&records, None).unwrap().name, "A");
        assert_eq!(select_record(&records, Some("C")).unwrap().length, 250.0);
        assert!(select_record(&records, Some("Z")).is_err());
        assert!(select_record(&[], None).is_err());
    }
}
