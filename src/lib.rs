//! SUMO Analysis Harness
//!
//! Runs the SUMO traffic simulator, parses the XML reports it writes and
//! turns them into summary statistics and HTML charts.

pub mod analytics;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod parser;
pub mod simulation;

pub use analyzer::Analyzer;
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use simulation::{RunOutcome, SimulationRunner};
