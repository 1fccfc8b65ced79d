//! Error types for simulation runs and report parsing

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running the simulator or reading its reports.
///
/// `ConfigNotFound`, `SimulationFailed` and `SimulatorUnavailable` abort a
/// run. The three report variants are recoverable: see
/// [`crate::parser::recover`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("simulation config '{}' not found", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("simulator exited with {}: {stderr}", code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")))]
    SimulationFailed { code: Option<i32>, stderr: String },

    #[error("could not start simulator '{program}': {source}")]
    SimulatorUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("report '{}' does not exist", path.display())]
    ReportMissing { path: PathBuf },

    #[error("report '{}' is malformed: {reason}", path.display())]
    MalformedReport { path: PathBuf, reason: String },

    #[error("report '{}' contains no matching records", path.display())]
    EmptyReport { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Whether the error is one the analysis pipelines degrade on instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ReportMissing { .. } | Self::MalformedReport { .. } | Self::EmptyReport { .. }
        )
    }
}

/// Alias for `Result<T, AnalysisError>`.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        let missing = AnalysisError::ReportMissing { path: "a.xml".into() };
        let failed = AnalysisError::SimulationFailed { code: Some(1), stderr: "boom".into() };

        assert!(missing.is_recoverable());
        assert!(!failed.is_recoverable());
        assert!(!AnalysisError::ConfigNotFound { path: "x.sumocfg".into() }.is_recoverable());
    }

    #[test]
    fn test_failure_message_carries_stderr() {
        let err = AnalysisError::SimulationFailed {
            code: Some(1),
            stderr: "Error: No network file".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("code 1"));
        assert!(msg.contains("No network file"));
    }
}
