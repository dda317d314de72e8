pub mod cli;
pub mod dsn;
pub mod file;

use crate::utils::error::Result;
use crate::utils::probe::ProbeKind;
use crate::utils::validation::{self, Validate};
use cli::CliArgs;
use file::FileConfig;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_RUNS: usize = 1000;
pub const DEFAULT_STEP: usize = 100;
pub const DEFAULT_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 1024;

/// Loop shape: how many iterations, how often to sample, how wide each batch is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSettings {
    pub runs: usize,
    pub step: usize,
    pub workers: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            step: DEFAULT_STEP,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_at_least("step", self.step, 1)?;
        validation::validate_range("workers", self.workers, 1, MAX_WORKERS)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub dsn: String,
    pub run: RunSettings,
    pub probe: ProbeKind,
    pub skip_ddl: bool,
    pub report_path: Option<PathBuf>,
}

impl HarnessConfig {
    /// Merges CLI/env values over the optional file, falling back to defaults.
    pub fn resolve(args: &CliArgs, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = RunSettings::default();

        let dsn = args.dsn.clone().or(file.connection.dsn);
        let dsn = validation::validate_required_field("dsn", &dsn)?.clone();

        Ok(Self {
            dsn,
            run: RunSettings {
                runs: args.runs.or(file.run.runs).unwrap_or(defaults.runs),
                step: args.step.or(file.run.step).unwrap_or(defaults.step),
                workers: args.workers.or(file.run.workers).unwrap_or(defaults.workers),
            },
            probe: args
                .probe
                .or(file.run.probe)
                .unwrap_or_else(ProbeKind::platform_default),
            skip_ddl: args.skip_ddl || file.run.skip_ddl.unwrap_or(false),
            report_path: args.report.clone().or(file.report.path),
        })
    }
}

impl Validate for HarnessConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_blank("dsn", &self.dsn)?;
        self.run.validate()?;

        if let Some(path) = &self.report_path {
            validation::validate_output_path("report", path)?;
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
