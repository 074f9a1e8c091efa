use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rootnet_growth::{
    observer::TracingObserver,
    params::GrowthParams,
    pareto::{BetaSweep, NormalizedPoint, ParetoPoint, SweepResult},
};
use serde::Serialize;

use super::DatasetArg;
use crate::{
    settings::{ExperimentSettings, SettingsArg},
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SweepArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    settings: SettingsArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct ParetoReport {
    generated_at: DateTime<Utc>,
    settings: ExperimentSettings,
    curves: Vec<CurveReport>,
}

#[derive(Debug, Clone, Serialize)]
struct CurveReport {
    name: String,
    points: Vec<ParetoPoint>,
    normalized: Vec<NormalizedPoint>,
    failures: Vec<FailureReport>,
}

#[derive(Debug, Clone, Serialize)]
struct FailureReport {
    beta: f64,
    error: String,
}

impl From<&SweepResult> for CurveReport {
    fn from(result: &SweepResult) -> Self {
        let curve = result.curve();
        Self {
            normalized: curve.normalized(),
            name: curve.name,
            points: curve.points,
            failures: result
                .failures()
                .map(|(beta, err)| FailureReport {
                    beta,
                    error: format!("{:#}", anyhow::Error::from(err.clone())),
                })
                .collect(),
        }
    }
}

pub(crate) fn run(arg: &SweepArg) -> anyhow::Result<()> {
    let settings = arg.settings.resolve()?;
    let records = arg.dataset.load()?;
    let mode = arg.settings.mode();
    let mut observer = TracingObserver::new();

    let mut curves = Vec::with_capacity(records.len());
    for record in &records {
        // beta is replaced per run by the sweep
        let params = GrowthParams::from_record(record, 0.5, settings.radius, settings.unit_length);
        let result = BetaSweep::new(params, settings.betas.clone())
            .with_field_init(settings.field)
            .run(mode, &mut observer);
        let report = CurveReport::from(&result);
        tracing::info!(
            name = %report.name,
            completed = report.points.len(),
            failed = report.failures.len(),
            "sweep finished"
        );
        curves.push(report);
    }

    let report = ParetoReport {
        generated_at: Utc::now(),
        settings,
        curves,
    };
    util::write_report(&report, arg.output.as_deref())
}
