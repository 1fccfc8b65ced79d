//! Analysis pipelines
//!
//! Each pipeline reads one report, builds a table, prints its statistics and
//! writes one chart. Report problems degrade to an empty table so one bad
//! report never stops the others.

use crate::analytics::summary::{print_emission_summary, print_trip_summary};
use crate::analytics::{EmissionSummary, ReportRenderer, Table, TableLogger, TripSummary};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::parser::{self, EmissionRecord, NetworkStep, QueueSample, TripRecord};
use crate::simulation::{RunOutcome, SimulationOutputs, SimulationRunner};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Tables produced by `Analyzer::run_all`
#[derive(Debug, Clone, Default)]
pub struct AnalysisTables {
    pub trips: Table<TripRecord>,
    pub emissions: Table<EmissionRecord>,
    pub queues: Table<QueueSample>,
    pub network: Table<NetworkStep>,
}

/// Runs the simulator and the four report pipelines
pub struct Analyzer {
    config: AnalysisConfig,
    renderer: ReportRenderer,
    logger: Option<TableLogger>,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let renderer = ReportRenderer::new(config.reports_dir())?;
        let logger = config.save_tables.then(|| TableLogger::new(config.logs_dir()));

        Ok(Self {
            config,
            renderer,
            logger,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn outputs(&self) -> SimulationOutputs {
        SimulationOutputs {
            tripinfo: self.config.tripinfo_output.clone(),
            summary: self.config.summary_output.clone(),
            lane: self.config.lane_output.clone(),
        }
    }

    /// Launch the simulator unless its outputs already exist
    pub fn run_simulation(&self) -> Result<RunOutcome> {
        let outputs = self.outputs();
        if outputs.already_present() {
            info!("Reports already on disk, skipping simulation");
            return Ok(RunOutcome::Skipped);
        }

        let sumo_config = self
            .config
            .sumo_config
            .as_deref()
            .context("No simulation config given (use --sumo-config or the config file)")?;

        let mut runner = SimulationRunner::new(self.config.sumo_binary.as_str());
        Ok(runner.run(sumo_config, &outputs)?)
    }

    /// Trip durations and the waiting time histogram
    pub fn trips(&self) -> Result<Table<TripRecord>> {
        let path = &self.config.tripinfo_output;
        let records = with_hint(
            parser::parse_trips(path),
            "The file is there but no vehicle reached its destination.",
        )?;
        if records.is_empty() {
            return Ok(Table::default());
        }

        let table = Table::from(records);
        print_trip_summary(&TripSummary::from_table(&table));
        self.renderer
            .render_waiting_histogram(&table, self.config.histogram_bins, path)?;
        self.save("trips", &table)?;

        Ok(table)
    }

    /// CO2 and fuel totals and the CO2 box plot
    pub fn emissions(&self) -> Result<Table<EmissionRecord>> {
        let path = &self.config.tripinfo_output;
        let records = with_hint(
            parser::parse_emissions(path),
            "No trip carries emission data. Was the emissions device enabled?",
        )?;
        if records.is_empty() {
            return Ok(Table::default());
        }

        let table = Table::from(records);
        print_emission_summary(&EmissionSummary::from_table(&table));
        self.renderer.render_co2_boxplot(&table, path)?;
        self.save("emissions", &table)?;

        Ok(table)
    }

    /// Jam lengths per road segment, optionally restricted to `target_ids`
    pub fn queues(&self, target_ids: Option<&HashSet<String>>) -> Result<Table<QueueSample>> {
        let path = &self.config.lane_output;
        let records = with_hint(
            parser::parse_queues(path, target_ids),
            "No queue data found. Check that the ids match those of the simulation.",
        )?;
        if records.is_empty() {
            return Ok(Table::default());
        }

        let table = Table::from(records);
        info!("Loaded {} queue samples", table.len());
        self.renderer.render_queue_series(&table, path)?;
        self.save("queues", &table)?;

        Ok(table)
    }

    /// Mean speed against halting vehicles
    pub fn network_speed(&self) -> Result<Table<NetworkStep>> {
        let path = &self.config.summary_output;
        let records = with_hint(
            parser::parse_network_steps(path),
            "The summary report holds no simulation step.",
        )?;
        if records.is_empty() {
            return Ok(Table::default());
        }

        let table = Table::from(records);
        info!("Loaded {} network steps", table.len());
        self.renderer.render_network_speed(&table, path)?;
        self.save("network_steps", &table)?;

        Ok(table)
    }

    /// All four pipelines, in order
    pub fn run_all(&self, target_ids: Option<&HashSet<String>>) -> Result<AnalysisTables> {
        Ok(AnalysisTables {
            trips: self.trips()?,
            emissions: self.emissions()?,
            queues: self.queues(target_ids)?,
            network: self.network_speed()?,
        })
    }

    fn save<R: Serialize>(&self, name: &str, table: &Table<R>) -> Result<()> {
        if let Some(logger) = &self.logger {
            logger.save_table(name, table)?;
        }
        Ok(())
    }
}

/// `parser::recover` plus a pipeline-specific hint when the report is empty
fn with_hint<T>(result: AnalysisResult<Vec<T>>, hint: &str) -> AnalysisResult<Vec<T>> {
    if matches!(result, Err(AnalysisError::EmptyReport { .. })) {
        warn!("{}", hint);
    }
    parser::recover(result)
}
