//! Simulation Runner
//!
//! Launches the simulator once with a fixed set of flags, unless the reports
//! of a previous run are already on disk.

use crate::error::{AnalysisError, AnalysisResult};
use crate::simulation::command::{CommandExecutor, SystemExecutor};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Report files a run is expected to produce
#[derive(Debug, Clone)]
pub struct SimulationOutputs {
    pub tripinfo: PathBuf,
    pub summary: PathBuf,
    pub lane: PathBuf,
}

impl SimulationOutputs {
    /// A run counts as done when the trip-info and lane reports both exist.
    /// Their contents are not checked.
    pub fn already_present(&self) -> bool {
        self.tripinfo.exists() && self.lane.exists()
    }
}

/// What `SimulationRunner::run` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Previous outputs were found, the simulator was not started
    Skipped,
    /// The simulator ran and exited successfully
    Completed,
}

/// Invokes the simulator through a `CommandExecutor`
pub struct SimulationRunner<E: CommandExecutor = SystemExecutor> {
    program: String,
    executor: E,
}

impl SimulationRunner<SystemExecutor> {
    /// Runner for the given simulator binary (usually `sumo`)
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_executor(program, SystemExecutor)
    }
}

impl<E: CommandExecutor> SimulationRunner<E> {
    pub fn with_executor(program: impl Into<String>, executor: E) -> Self {
        Self {
            program: program.into(),
            executor,
        }
    }

    #[cfg(test)]
    pub(crate) fn executor(&self) -> &E {
        &self.executor
    }

    /// Run the simulation for `config_path`, writing the given reports.
    ///
    /// No retry on failure: a run is expensive and may leave partial files.
    pub fn run(&mut self, config_path: &Path, outputs: &SimulationOutputs) -> AnalysisResult<RunOutcome> {
        if outputs.already_present() {
            info!(
                "Outputs {} and {} already exist, skipping simulation",
                outputs.tripinfo.display(),
                outputs.lane.display()
            );
            return Ok(RunOutcome::Skipped);
        }

        if !config_path.exists() {
            return Err(AnalysisError::ConfigNotFound {
                path: config_path.to_path_buf(),
            });
        }

        let args = simulator_args(config_path, outputs);
        info!("Launching simulation {}...", config_path.display());
        debug!("{} {}", self.program, args.join(" "));

        let output = self
            .executor
            .execute(&self.program, &args)
            .map_err(|source| AnalysisError::SimulatorUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.success() {
            error!("Simulator stderr:\n{}", output.stderr);
            return Err(AnalysisError::SimulationFailed {
                code: output.code,
                stderr: output.stderr,
            });
        }

        info!(
            "Simulation complete. Files created: {}, {}, {}",
            outputs.tripinfo.display(),
            outputs.summary.display(),
            outputs.lane.display()
        );
        Ok(RunOutcome::Completed)
    }
}

/// Fixed simulator command line. The lane report is declared in the
/// simulator config itself, so it is not passed here.
pub fn simulator_args(config_path: &Path, outputs: &SimulationOutputs) -> Vec<String> {
    vec![
        "-c".to_string(),
        config_path.display().to_string(),
        "--tripinfo-output".to_string(),
        outputs.tripinfo.display().to_string(),
        "--summary-output".to_string(),
        outputs.summary.display().to_string(),
        "--device.emissions.probability".to_string(),
        "1".to_string(),
        "--quit-on-end".to_string(),
        "true".to_string(),
        "--no-step-log".to_string(),
        "true".to_string(),
    ]
}
