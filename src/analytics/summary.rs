//! Summary statistics printed to the terminal

use crate::analytics::table::Table;
use crate::parser::{EmissionRecord, TripRecord};
use serde::{Deserialize, Serialize};

/// Trip duration statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripSummary {
    /// Number of completed trips
    pub vehicles: usize,
    /// Mean trip duration (s)
    pub mean_duration: f64,
    /// Mean waiting time (s)
    pub mean_waiting_time: f64,
    /// Mean time loss (s)
    pub mean_time_loss: f64,
}

impl TripSummary {
    /// Requires a non-empty table
    pub fn from_table(table: &Table<TripRecord>) -> Self {
        Self {
            vehicles: table.len(),
            mean_duration: table.mean(|t| t.duration),
            mean_waiting_time: table.mean(|t| t.waiting_time),
            mean_time_loss: table.mean(|t| t.time_loss),
        }
    }
}

/// Emission statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmissionSummary {
    /// Vehicles carrying emission data
    pub vehicles: usize,
    /// Total CO2 (g)
    pub total_co2: f64,
    /// Mean CO2 per vehicle (g)
    pub mean_co2: f64,
    /// Total fuel (mL)
    pub total_fuel: f64,
    /// Mean fuel per vehicle (mL)
    pub mean_fuel: f64,
}

impl EmissionSummary {
    /// Requires a non-empty table
    pub fn from_table(table: &Table<EmissionRecord>) -> Self {
        Self {
            vehicles: table.len(),
            total_co2: table.sum(|e| e.co2),
            mean_co2: table.mean(|e| e.co2),
            total_fuel: table.sum(|e| e.fuel),
            mean_fuel: table.mean(|e| e.fuel),
        }
    }
}

/// Format trip statistics
pub fn format_trip_summary(s: &TripSummary) -> String {
    format!(
        "Analysis of {} vehicles complete.\n\
         Average Duration: {:.2}s\n\
         Average Waiting Time: {:.2}s\n\
         Average Time Loss: {:.2}s",
        s.vehicles, s.mean_duration, s.mean_waiting_time, s.mean_time_loss,
    )
}

/// Format emission statistics
pub fn format_emission_summary(s: &EmissionSummary) -> String {
    format!(
        "--- Emissions Report ---\n\
         Total CO2 Emissions: {:.2} g\n\
         Average CO2 Emissions: {:.2} g/vehicle\n\
         Total Fuel Consumption: {:.2} mL\n\
         Average Fuel Consumption: {:.2} mL/vehicle",
        s.total_co2, s.mean_co2, s.total_fuel, s.mean_fuel,
    )
}

/// Print trip statistics to the terminal
pub fn print_trip_summary(s: &TripSummary) {
    println!("{}", format_trip_summary(s));
}

/// Print emission statistics to the terminal
pub fn print_emission_summary(s: &EmissionSummary) {
    println!("{}", format_emission_summary(s));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(id: &str, duration: f64, waiting_time: f64) -> TripRecord {
        TripRecord {
            id: id.to_string(),
            duration,
            waiting_time,
            time_loss: 0.5,
        }
    }

    #[test]
    fn test_trip_means() {
        let table = Table::from(vec![trip("veh0", 10.0, 2.0), trip("veh1", 20.0, 4.0)]);
        let summary = TripSummary::from_table(&table);

        let text = format_trip_summary(&summary);
        assert!(text.contains("Analysis of 2 vehicles"));
        assert!(text.contains("Average Duration: 15.00s"));
        assert!(text.contains("Average Waiting Time: 3.00s"));
        assert!(text.contains("Average Time Loss: 0.50s"));
    }

    #[test]
    fn test_emission_totals() {
        let table = Table::from(vec![
            EmissionRecord { id: "veh0".into(), co2: 2500.0, fuel: 1075.0 },
            EmissionRecord { id: "veh2".into(), co2: 1500.25, fuel: 25.0 },
        ]);
        let summary = EmissionSummary::from_table(&table);

        assert_eq!(summary.vehicles, 2);
        assert_eq!(summary.total_fuel, 1100.0);
        assert_eq!(summary.mean_fuel, 550.0);

        let text = format_emission_summary(&summary);
        assert!(text.contains("Total CO2 Emissions: 4000.25 g"));
        assert!(text.contains("Average Fuel Consumption: 550.00 mL/vehicle"));
    }
}
