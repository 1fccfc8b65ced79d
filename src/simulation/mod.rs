//! Simulator invocation

pub mod command;
pub mod runner;

pub use command::{CommandExecutor, CommandOutput, SystemExecutor};
pub use runner::{RunOutcome, SimulationOutputs, SimulationRunner};
