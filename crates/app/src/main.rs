mod config;
mod export;
mod runner;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use crate::config::ScenarioFile;

/// Simulate constant-current battery discharge curves.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON scenario file. Defaults to the Nickel-Metal cell at 6.5 A, 13 A and 32.5 A.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write one CSV per scenario into this directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Render all curves to this PNG file.
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Override the cutoff voltage (V).
    #[arg(long)]
    cutoff_voltage: Option<f64>,

    /// Override the per-run iteration cap.
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn scenario_file(&self) -> Result<ScenarioFile> {
        let mut file = match &self.config {
            Some(path) => ScenarioFile::load(path)?,
            None => ScenarioFile::default(),
        };
        if let Some(cutoff) = self.cutoff_voltage {
            file.options.cutoff_voltage = cutoff;
        }
        if let Some(max_iterations) = self.max_iterations {
            file.options.max_iterations = max_iterations;
        }
        Ok(file)
    }
}

fn init_logging(level: LevelFilter) -> Result<()> {
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto)
        .context("failed to initialise logging")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.level_filter())?;

    let file = cli.scenario_file()?;
    let outcomes = runner::run_all(&file, &file.options)?;
    for outcome in &outcomes {
        runner::log_summary(outcome);
    }

    if let Some(dir) = &cli.output_dir {
        let paths = export::write_csv_files(dir, &outcomes)?;
        info!("wrote {} CSV files to {}", paths.len(), dir.display());
    }
    if let Some(path) = &cli.plot {
        export::write_chart(path, &outcomes)?;
        info!("wrote chart to {}", path.display());
    }

    if cli.output_dir.is_none() && cli.plot.is_none() {
        for outcome in &outcomes {
            let summary = &outcome.result.summary;
            println!(
                "{:<20} {:>6} samples {:>8.2} min {:>7.3} Ah  {:?}",
                outcome.scenario.name,
                summary.samples_emitted,
                summary.runtime_minutes,
                summary.delivered_charge_ah,
                summary.termination,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        let quiet = Cli::parse_from(["discharge-sim"]);
        assert_eq!(quiet.level_filter(), LevelFilter::Warn);
        let loud = Cli::parse_from(["discharge-sim", "-vvv"]);
        assert_eq!(loud.level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn test_overrides_apply_to_default_file() {
        let cli = Cli::parse_from([
            "discharge-sim",
            "--cutoff-voltage",
            "1.1",
            "--max-iterations",
            "50",
        ]);
        let file = cli.scenario_file().unwrap();
        assert_eq!(file.options.cutoff_voltage, 1.1);
        assert_eq!(file.options.max_iterations, 50);
        assert_eq!(file.scenarios.len(), 3);
    }
}
