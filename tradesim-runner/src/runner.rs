//! Simulation runner: wires config, journals, and the engine.
//!
//! Two entry points:
//! - `run_simulation()`: opens the CSV journals named in the config, then runs. Used by CLI.
//! - `run_with_journals()`: takes caller-supplied sinks. No file I/O.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradesim_core::journal::{OrderSink, TickSink};
use tradesim_core::position::{OrderStats, PositionManager};
use tradesim_core::simulation::PriceProcess;
use tradesim_core::strategy::CrossoverStrategy;
use tradesim_core::Engine;

use crate::config::SimConfig;
use crate::journal::{JournalOpenError, OrderCsvJournal, TickCsvJournal};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("journal error: {0}")]
    Journal(#[from] JournalOpenError),
}

/// Summary of a completed simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub steps: u64,
    /// Simulated time covered by the run.
    pub elapsed_sim_time_ms: u64,
    pub final_price: f64,
    pub orders: OrderStats,
    pub position: f64,
    pub realized_pnl: f64,
    /// Realized PnL plus the open position marked at `final_price`.
    pub total_pnl: f64,
}

/// Build the engine from a config and a pair of sinks.
pub fn build_engine(
    config: &SimConfig,
    ticks: impl TickSink + 'static,
    orders: impl OrderSink + 'static,
) -> Engine {
    let position_manager = PositionManager::new(
        config.position_limits(),
        config.exchange.rejection_probability,
        orders,
    );
    let strategy = CrossoverStrategy::new(
        config.trade.fast_ema,
        config.trade.slow_ema,
        position_manager,
    );
    PriceProcess::new(config.market_params(), ticks, strategy)
}

/// Open the CSV journals from the config and run to completion.
///
/// Failing to open either journal aborts before any step runs.
pub fn run_simulation(config: &SimConfig) -> Result<SimulationReport, RunError> {
    let ticks = TickCsvJournal::open(&config.simulation.price_evolution_path)?;
    let orders = OrderCsvJournal::open(&config.simulation.orders_log_path)?;
    Ok(run_with_journals(config, ticks, orders))
}

/// Run `steps_count` steps against the given sinks.
pub fn run_with_journals(
    config: &SimConfig,
    ticks: impl TickSink + 'static,
    orders: impl OrderSink + 'static,
) -> SimulationReport {
    let started_at = Utc::now();
    let clock = Instant::now();

    let mut engine = build_engine(config, ticks, orders);
    tracing::info!(
        steps = config.simulation.steps_count,
        initial_price = config.price.initial_price,
        "simulation started"
    );

    engine.run(config.simulation.steps_count);

    let report = summarize(&engine, started_at, clock.elapsed().as_secs_f64());
    tracing::info!(
        steps = report.steps,
        final_price = report.final_price,
        position = report.position,
        total_pnl = report.total_pnl,
        "simulation finished"
    );
    report
}

fn summarize(engine: &Engine, started_at: DateTime<Utc>, duration_secs: f64) -> SimulationReport {
    let tick = engine.current_tick();
    let pm = engine.handler().signals();

    SimulationReport {
        started_at,
        duration_secs,
        steps: engine.steps_taken(),
        elapsed_sim_time_ms: tick.timestamp.as_millis() as u64,
        final_price: tick.price,
        orders: pm.stats(),
        position: pm.position(),
        realized_pnl: pm.realized_pnl(),
        total_pnl: pm.total_pnl(tick.price),
    }
}
