//! Persistence of parsed tables as JSON logs

use crate::analytics::table::Table;
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes parsed tables to `<logs_dir>/<name>_<timestamp>.json`
pub struct TableLogger {
    logs_dir: PathBuf,
}

impl TableLogger {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
        }
    }

    /// Save a table as a JSON array of rows
    pub fn save_table<R: Serialize>(&self, name: &str, table: &Table<R>) -> Result<PathBuf> {
        fs::create_dir_all(&self.logs_dir).context("Failed to create logs directory")?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = self.logs_dir.join(format!("{}_{}.json", name, timestamp));

        let json = serde_json::to_string_pretty(table).context("Failed to serialize table")?;

        let mut file = File::create(&path).context("Failed to create log file")?;
        file.write_all(json.as_bytes())
            .context("Failed to write log file")?;

        info!("Table saved to: {}", path.display());
        Ok(path)
    }

    /// Load a table written by `save_table`
    pub fn load_table<R: DeserializeOwned>(path: &Path) -> Result<Table<R>> {
        let contents = fs::read_to_string(path).context("Failed to read table file")?;

        let rows: Vec<R> = serde_json::from_str(&contents).context("Failed to parse table file")?;
        Ok(Table::from(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NetworkStep;

    #[test]
    fn test_saved_table_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let logger = TableLogger::new(dir.path().join("logs"));
        let table = Table::from(vec![
            NetworkStep { time: 0.0, mean_speed: -1.0, halting: 0 },
            NetworkStep { time: 1.0, mean_speed: 9.5, halting: 2 },
        ]);

        let path = logger.save_table("network_steps", &table).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("network_steps_"));

        let loaded: Table<NetworkStep> = TableLogger::load_table(&path).unwrap();
        assert_eq!(loaded, table);
    }
}
