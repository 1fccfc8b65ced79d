//! SUMO Analysis CLI
//!
//! Command-line interface for running simulations and analyzing their reports.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sumo_analysis::{
    config::AnalysisConfig,
    simulation::{runner::simulator_args, RunOutcome, SimulationOutputs},
    Analyzer,
};

#[derive(Parser)]
#[command(name = "sumo-report")]
#[command(author = "MoCoM Team")]
#[command(version = "0.1.0")]
#[command(about = "Run SUMO simulations and chart their reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON analysis configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    paths: PathArgs,
}

/// Overrides for the configured file locations
#[derive(Args)]
struct PathArgs {
    /// Simulator executable
    #[arg(long, global = true)]
    sumo_binary: Option<String>,

    /// Trip-info report
    #[arg(long, global = true)]
    tripinfo: Option<PathBuf>,

    /// Summary report
    #[arg(long, global = true)]
    summary: Option<PathBuf>,

    /// Lane/edge report
    #[arg(long, global = true)]
    lane: Option<PathBuf>,

    /// Output directory for reports and logs
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Save parsed tables as JSON under <output>/logs
    #[arg(long, global = true)]
    save_tables: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation (skipped when its outputs already exist)
    Run {
        /// SUMO configuration file (.sumocfg)
        #[arg(short = 'c', long)]
        sumo_config: Option<PathBuf>,
    },

    /// Trip duration and waiting time analysis
    Trips,

    /// CO2 and fuel analysis
    Emissions,

    /// Queue length analysis
    Queues {
        /// Edge or lane id to keep (repeatable, default all)
        #[arg(short, long = "target")]
        targets: Vec<String>,
    },

    /// Network speed vs congestion analysis
    Speed,

    /// Run the simulation, then every analysis
    All {
        /// SUMO configuration file (.sumocfg)
        #[arg(short = 'c', long)]
        sumo_config: Option<PathBuf>,

        /// Edge or lane id to keep in the queue analysis (repeatable)
        #[arg(short, long = "target")]
        targets: Vec<String>,
    },

    /// Print configuration info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    apply_overrides(&mut config, &cli.paths);

    match cli.command {
        Commands::Run { sumo_config } => {
            if sumo_config.is_some() {
                config.sumo_config = sumo_config;
            }
            run_simulation(Analyzer::new(config)?)?;
        }

        Commands::Trips => {
            Analyzer::new(config)?.trips()?;
        }

        Commands::Emissions => {
            Analyzer::new(config)?.emissions()?;
        }

        Commands::Queues { targets } => {
            let targets = target_set(targets);
            Analyzer::new(config)?.queues(targets.as_ref())?;
        }

        Commands::Speed => {
            Analyzer::new(config)?.network_speed()?;
        }

        Commands::All { sumo_config, targets } => {
            if sumo_config.is_some() {
                config.sumo_config = sumo_config;
            }
            let analyzer = Analyzer::new(config)?;
            run_simulation_then_analyze(&analyzer, target_set(targets))?;
        }

        Commands::Info => {
            print_info(&config);
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut AnalysisConfig, paths: &PathArgs) {
    if let Some(binary) = &paths.sumo_binary {
        config.sumo_binary = binary.clone();
    }
    if let Some(path) = &paths.tripinfo {
        config.tripinfo_output = path.clone();
    }
    if let Some(path) = &paths.summary {
        config.summary_output = path.clone();
    }
    if let Some(path) = &paths.lane {
        config.lane_output = path.clone();
    }
    if let Some(dir) = &paths.output {
        config.output_dir = dir.clone();
    }
    if paths.save_tables {
        config.save_tables = true;
    }
}

/// No ids on the command line means no filter
fn target_set(targets: Vec<String>) -> Option<HashSet<String>> {
    if targets.is_empty() {
        None
    } else {
        Some(targets.into_iter().collect())
    }
}

fn run_simulation(analyzer: Analyzer) -> Result<()> {
    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║       SUMO Simulation                                    ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    match analyzer.run_simulation()? {
        RunOutcome::Skipped => println!("⏭  Outputs already exist. Simulation skipped."),
        RunOutcome::Completed => println!("✅ Simulation finished."),
    }
    println!();

    Ok(())
}

fn run_simulation_then_analyze(analyzer: &Analyzer, targets: Option<HashSet<String>>) -> Result<()> {
    analyzer.run_simulation()?;

    let tables = analyzer.run_all(targets.as_ref())?;

    info!(
        "Analyzed {} trips, {} emission records, {} queue samples, {} network steps",
        tables.trips.len(),
        tables.emissions.len(),
        tables.queues.len(),
        tables.network.len()
    );

    println!();
    println!("📊 Reports written to: {}", analyzer.config().reports_dir().display());
    println!("   Open them in a browser to view the charts");
    println!();

    Ok(())
}

fn print_info(config: &AnalysisConfig) {
    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║       SUMO Analysis - Info                               ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();
    println!("REPORTS:");
    println!("  Trip info:     {}", config.tripinfo_output.display());
    println!("  Summary:       {}", config.summary_output.display());
    println!("  Lane output:   {}", config.lane_output.display());
    println!("  Charts:        {}", config.reports_dir().display());
    println!();
    println!("SIMULATOR COMMAND:");
    let sumo_config = config
        .sumo_config
        .clone()
        .unwrap_or_else(|| PathBuf::from("<config.sumocfg>"));
    let outputs = SimulationOutputs {
        tripinfo: config.tripinfo_output.clone(),
        summary: config.summary_output.clone(),
        lane: config.lane_output.clone(),
    };
    println!("  {} {}", config.sumo_binary, simulator_args(&sumo_config, &outputs).join(" "));
    println!();
    println!("USAGE:");
    println!("  sumo-report all -c grid.sumocfg       # Simulate and analyze");
    println!("  sumo-report trips                     # Waiting time histogram");
    println!("  sumo-report queues -t E1 -t E2        # Queues on selected edges");
    println!();
}
