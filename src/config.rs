//! Analysis configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Simulator executable, looked up on PATH when not absolute
    pub sumo_binary: String,

    /// `.sumocfg` file handed to the simulator
    pub sumo_config: Option<PathBuf>,

    /// Trip-info report (per-vehicle trips and emissions)
    pub tripinfo_output: PathBuf,

    /// Summary report (per-step network aggregates)
    pub summary_output: PathBuf,

    /// Lane/edge report (per-interval jam lengths)
    pub lane_output: PathBuf,

    /// Output directory for reports and logs
    pub output_dir: PathBuf,

    /// Number of bins for the waiting time histogram
    pub histogram_bins: usize,

    /// Persist every parsed table as JSON under `<output_dir>/logs`
    pub save_tables: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sumo_binary: "sumo".to_string(),
            sumo_config: None,
            tripinfo_output: PathBuf::from("tripinfo.xml"),
            summary_output: PathBuf::from("summary.xml"),
            lane_output: PathBuf::from("lane_output.xml"),
            output_dir: PathBuf::from("output"),
            histogram_bins: 30,
            save_tables: false,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Directory the HTML chart pages are written to
    pub fn reports_dir(&self) -> PathBuf {
        self.output_dir.join("reports")
    }

    /// Directory the JSON tables are written to
    pub fn logs_dir(&self) -> PathBuf {
        self.output_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_simulator_file_names() {
        let config = AnalysisConfig::default();
        assert_eq!(config.tripinfo_output, PathBuf::from("tripinfo.xml"));
        assert_eq!(config.summary_output, PathBuf::from("summary.xml"));
        assert_eq!(config.lane_output, PathBuf::from("lane_output.xml"));
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.reports_dir(), PathBuf::from("output/reports"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        fs::write(&path, r#"{ "sumo_config": "grid.sumocfg", "save_tables": true }"#).unwrap();

        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.sumo_config, Some(PathBuf::from("grid.sumocfg")));
        assert!(config.save_tables);
        assert_eq!(config.sumo_binary, "sumo");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AnalysisConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
