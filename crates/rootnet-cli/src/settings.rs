use std::path::PathBuf;

use anyhow::Context as _;
use rootnet_engine::FieldInit;
use rootnet_growth::{growth_engine::EvaluationMode, pareto::DEFAULT_BETAS};
use serde::{Deserialize, Serialize};

use crate::util;

/// Driver settings shared by every run of an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentSettings {
    pub unit_length: f64,
    pub radius: f64,
    pub betas: Vec<f64>,
    pub field: FieldInit,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            unit_length: 1.0,
            radius: 10.0,
            betas: DEFAULT_BETAS.to_vec(),
            field: FieldInit::Uniform,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SettingsArg {
    /// JSON settings file; flags below override its values
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Side length of one field cell
    #[arg(long)]
    unit_length: Option<f64>,
    /// Reach of every node
    #[arg(long)]
    radius: Option<f64>,
    /// Comma-separated betas to sweep
    #[arg(long, value_delimiter = ',')]
    betas: Vec<f64>,
    /// Fill the field randomly with this resource density instead of uniformly
    #[arg(long)]
    density: Option<f64>,
    /// Seed for the random field
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Evaluate the candidates of each iteration on separate threads
    #[arg(long)]
    parallel: bool,
}

impl SettingsArg {
    pub(crate) fn resolve(&self) -> anyhow::Result<ExperimentSettings> {
        let mut settings = match &self.settings {
            Some(path) => util::read_json_file("settings", path)?,
            None => ExperimentSettings::default(),
        };
        if let Some(unit_length) = self.unit_length {
            settings.unit_length = unit_length;
        }
        if let Some(radius) = self.radius {
            settings.radius = radius;
        }
        if !self.betas.is_empty() {
            settings.betas.clone_from(&self.betas);
        }
        if let Some(density) = self.density {
            settings.field = FieldInit::Random {
                density,
                seed: self.seed,
            };
        }
        settings
            .field
            .validate()
            .context("Invalid field settings")?;
        tracing::debug!(?settings, "settings resolved");
        Ok(settings)
    }

    pub(crate) fn mode(&self) -> EvaluationMode {
        if self.parallel {
            EvaluationMode::Parallel
        } else {
            EvaluationMode::Sequential
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_file_uses_defaults() {
        let settings: ExperimentSettings = serde_json::from_str(r#"{"radius": 3.0}"#).unwrap();
        assert_eq!(settings.radius, 3.0);
        assert_eq!(settings.unit_length, 1.0);
        assert_eq!(settings.betas, vec![0.2, 0.4, 0.6, 0.8]);
        assert_eq!(settings.field, FieldInit::Uniform);

        let settings: ExperimentSettings = serde_json::from_str(
            r#"{"field": {"kind": "random", "density": 0.5, "seed": 7}}"#,
        )
        .unwrap();
        assert_eq!(
            settings.field,
            FieldInit::Random {
                density: 0.5,
                seed: 7
            }
        );
    }

    #[test]
    fn test_flags_override_defaults() {
        let arg = SettingsArg {
            radius: Some(2.0),
            betas: vec![0.5],
            density: Some(0.25),
            seed: 3,
            parallel: true,
            ..SettingsArg::default()
        };
        let settings = arg.resolve().unwrap();
        assert_eq!(settings.radius, 2.0);
        assert_eq!(settings.unit_length, 1.0);
        assert_eq!(settings.betas, vec![0.5]);
        assert_eq!(
            settings.field,
            FieldInit::Random {
                density: 0.25,
                seed: 3
            }
        );
        assert_eq!(arg.mode(), EvaluationMode::Parallel);
    }

    #[test]
    fn test_invalid_density_flag_is_an_error() {
        for density in [f64::NAN, 1.5] {
            let arg = SettingsArg {
                density: Some(density),
                ..SettingsArg::default()
            };
            let err = arg.resolve().unwrap_err();
            assert!(
                format!("{err:#}").contains("resource density must lie in [0, 1]"),
                "unexpected error: {err:#}"
            );
        }
    }
}
