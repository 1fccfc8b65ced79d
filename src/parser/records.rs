//! Flat records extracted from simulator reports

use serde::{Deserialize, Serialize};

/// One completed vehicle trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    /// Trip duration (s)
    pub duration: f64,
    /// Time spent standing (s)
    pub waiting_time: f64,
    /// Time lost against free-flow driving (s)
    pub time_loss: f64,
}

/// Emissions of one trip, already converted to g / mL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub id: String,
    /// CO2 emitted (g)
    pub co2: f64,
    /// Fuel consumed (mL)
    pub fuel: f64,
}

/// Jam length of one road segment within one reporting interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSample {
    /// Interval begin (s)
    pub time: f64,
    /// Edge or lane id
    pub id: String,
    /// Maximum jam length (m), 0 when not reported
    pub queue_length: f64,
}

/// Network-wide aggregates for one simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStep {
    pub time: f64,
    /// Mean speed of running vehicles (m/s). The simulator reports -1 when none are running.
    pub mean_speed: f64,
    /// Number of halting vehicles
    pub halting: u32,
}
