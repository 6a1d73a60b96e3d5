//! The headless command line driver.
//!
//! [`run_with_args`] parses the command line, builds a [`Simulation`], runs it until the
//! epidemic burns out or the round limit is reached, and writes the reports.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use crate::contact::ContactStrategy;
use crate::error::EpiError;
use crate::execution_stats::{
    log_execution_statistics, print_execution_statistics, ExecutionProfilingCollector,
};
use crate::log::set_log_level;
use crate::parameters::Parameters;
use crate::report::{write_population, write_statistics, ReportOptions};
use crate::simulation::Simulation;
use crate::statistics::StatisticsRecord;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments of the `epigrid` binary
#[derive(Parser, Debug, Clone)]
#[command(name = "epigrid", version, about)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path to a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of agents
    #[arg(short, long, default_value = "1600")]
    pub population: usize,

    /// Stop after this many rounds even if infections remain
    #[arg(short, long, default_value = "365")]
    pub max_rounds: u32,

    /// Overrides the contact strategy from the parameters file
    #[arg(long, value_enum)]
    pub contact_strategy: Option<ContactStrategy>,

    /// Optional directory for report output. No reports are written without it
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for report file names
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Replace existing report files
    #[arg(long)]
    pub overwrite: bool,

    /// Also write the final population to a `population` report
    #[arg(long)]
    pub snapshot: bool,

    /// Enable logging at the given level
    #[arg(short, long, value_enum, default_value = "off")]
    pub log_level: LogLevel,

    /// Suppress the execution summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for BaseArgs {
    fn default() -> Self {
        BaseArgs {
            random_seed: 0,
            config: None,
            population: 1600,
            max_rounds: 365,
            contact_strategy: None,
            output_dir: None,
            file_prefix: String::new(),
            overwrite: false,
            snapshot: false,
            log_level: LogLevel::Off,
            quiet: true,
        }
    }
}

/// Resolves the parameters for a run: the config file if given, else the defaults, with
/// command line overrides applied on top.
///
/// # Errors
///
/// Returns an `EpiError` if the config file cannot be loaded or is invalid.
pub fn load_parameters(args: &BaseArgs) -> Result<Parameters, EpiError> {
    let mut parameters = match &args.config {
        Some(path) => {
            info!("Loading parameters from: {}", path.display());
            Parameters::from_json_file(Path::new(path))?
        }
        None => Parameters::default(),
    };
    if let Some(strategy) = args.contact_strategy {
        parameters.contact_strategy = strategy;
    }
    Ok(parameters)
}

/// Runs a simulation described by already parsed arguments and returns it, so callers can
/// inspect the final state.
///
/// # Errors
///
/// Returns an `EpiError` if the parameters are invalid or a report cannot be written.
pub fn run_with_args_internal(args: &BaseArgs) -> Result<Simulation, EpiError> {
    let parameters = load_parameters(args)?;
    let mut collector = ExecutionProfilingCollector::new();
    let mut simulation = Simulation::new(args.population, parameters, args.random_seed)?;

    for _ in 0..args.max_rounds {
        if simulation.is_finished() {
            break;
        }
        simulation.step()?;
        collector.refresh();
    }
    info!(
        "Finished after {} rounds: {}",
        simulation.round(),
        summary_line(simulation.latest())
    );

    if let Some(output_dir) = &args.output_dir {
        let mut options = ReportOptions::default();
        options
            .directory(output_dir.clone())
            .file_prefix(args.file_prefix.clone())
            .overwrite(args.overwrite);
        let path = write_statistics(&options, simulation.history())?;
        info!("Wrote statistics report to {}", path.display());
        if args.snapshot {
            let path = write_population(&options, simulation.population())?;
            info!("Wrote population report to {}", path.display());
        }
    }

    let stats = collector.compute_final_statistics(args.population, simulation.round());
    log_execution_statistics(&stats);
    if !args.quiet {
        print_execution_statistics(&stats);
    }
    Ok(simulation)
}

/// Parses the command line and runs the simulation it describes, printing a one line summary
/// of the final round.
///
/// # Errors
///
/// Returns an error if argument parsing, parameter loading or report writing fails.
pub fn run_with_args() -> Result<Simulation, EpiError> {
    let args = BaseArgs::parse();
    if args.log_level != LogLevel::Off {
        set_log_level(args.log_level.into());
    }
    let simulation = run_with_args_internal(&args)?;
    println!(
        "round {}: {}",
        simulation.round(),
        summary_line(simulation.latest())
    );
    Ok(simulation)
}

fn summary_line(record: &StatisticsRecord) -> String {
    format!(
        "susceptible={} infected={} recovered={} dead={}",
        record.susceptible, record.infected, record.recovered, record.dead
    )
}
