//! Simulator report parsing

pub mod records;
pub mod xml;

pub use records::{EmissionRecord, NetworkStep, QueueSample, TripRecord};
pub use xml::{parse_emissions, parse_network_steps, parse_queues, parse_trips};

use crate::error::{AnalysisError, AnalysisResult};
use tracing::{error, warn};

/// Degrade a recoverable parse failure to an empty record set.
///
/// Missing, malformed and empty reports are reported to the user and yield
/// `Ok(vec![])`. Any other error is passed through.
pub fn recover<T>(result: AnalysisResult<Vec<T>>) -> AnalysisResult<Vec<T>> {
    match result {
        Err(e) if e.is_recoverable() => {
            match e {
                AnalysisError::ReportMissing { .. } => error!("{}. Was the simulation run first?", e),
                AnalysisError::MalformedReport { .. } => error!("{} (simulation unfinished or crashed?)", e),
                _ => warn!("{}", e),
            }
            Ok(Vec::new())
        }
        other => other,
    }
}
