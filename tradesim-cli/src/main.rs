//! tradesim CLI: run the crossover simulation or write a default config.
//!
//! Commands:
//! - `run`: load (or create) a TOML config, run the simulation, print a report
//! - `init`: write a default config file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tradesim_runner::{run_simulation, ConfigSource, SimConfig, SimulationReport};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Parser)]
#[command(
    name = "tradesim",
    about = "tradesim: EMA crossover strategy against a simulated exchange"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation described by a TOML config file.
    Run {
        /// Path to a TOML config file. Defaults to config.toml next to the executable.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the report as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a default config file.
    Init {
        /// Destination. Defaults to config.toml next to the executable.
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run { config, json } => run_cmd(config, json),
        Commands::Init { path, force } => init_cmd(path, force),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn default_config_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

fn resolve_config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

fn run_cmd(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let path = resolve_config_path(config_path)?;
    tracing::debug!(path = %path.display(), "using config");

    let (config, source) = SimConfig::load_or_create(&path)
        .with_context(|| format!("loading config {}", path.display()))?;
    if source == ConfigSource::CreatedDefault {
        println!(
            "Config file not found; wrote defaults to {}",
            path.display()
        );
    }

    let report = run_simulation(&config).context("simulation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&config, &report);
    }
    Ok(())
}

fn init_cmd(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = resolve_config_path(path)?;
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    SimConfig::write_default(&path)
        .with_context(|| format!("writing default config {}", path.display()))?;
    println!("Default config written to {}", path.display());
    Ok(())
}

fn print_summary(config: &SimConfig, report: &SimulationReport) {
    println!("=== Simulation Summary ===");
    println!(
        "Steps:            {} ({:.3}s wall clock)",
        report.steps, report.duration_secs
    );
    println!(
        "Simulated time:   {:.3}s",
        report.elapsed_sim_time_ms as f64 / 1_000.0
    );
    println!(
        "Price:            {:.3} -> {:.3}",
        config.price.initial_price, report.final_price
    );
    println!(
        "Orders:           {} submitted, {} executed, {} rejected",
        report.orders.submitted, report.orders.executed, report.orders.rejected
    );
    println!("Position:         {:.3}", report.position);
    println!("Realized PnL:     {:.3}", report.realized_pnl);
    println!("Total PnL:        {:.3}", report.total_pnl);
    print_journal_path("Tick log", &config.simulation.price_evolution_path);
    print_journal_path("Order log", &config.simulation.orders_log_path);
}

fn print_journal_path(label: &str, path: &Path) {
    println!("{:<18}{}", format!("{label}:"), path.display());
}
