//! End-to-end tests of the wired engine using in-memory journals.

use std::time::Duration;
use tradesim_core::domain::{ReplyStatus, Tick};
use tradesim_core::journal::MemoryJournal;
use tradesim_core::position::{PositionLimits, PositionManager};
use tradesim_core::simulation::{GbmParams, MarketParams, PriceProcess};
use tradesim_core::strategy::{CrossoverStrategy, TickHandler};
use tradesim_core::Engine;

// ── Helpers ──────────────────────────────────────────────────────────

fn market(variation: f64) -> MarketParams {
    MarketParams {
        initial_price: 100.0,
        gbm: GbmParams {
            average_trend_value: 0.05,
            price_variation: variation,
            time_horizon: Duration::from_secs(60),
        },
        min_diff_time: Duration::from_millis(100),
        max_diff_time: Duration::from_millis(200),
        min_volume: 1.0,
        max_volume: 100.0,
    }
}

fn engine(
    params: MarketParams,
    limits: PositionLimits,
    rejection: f64,
) -> (Engine, MemoryJournal, MemoryJournal) {
    let ticks = MemoryJournal::new();
    let orders = MemoryJournal::new();
    let pm = PositionManager::new(limits, rejection, orders.clone());
    let strategy = CrossoverStrategy::new(Duration::from_secs(1), Duration::from_secs(5), pm);
    let process = PriceProcess::new(params, ticks.clone(), strategy);
    (process, ticks, orders)
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn single_step_near_zero_noise() {
    let mut params = market(1e-6);
    params.gbm.average_trend_value = 0.0;
    params.gbm.time_horizon = Duration::from_secs(24 * 3600);
    params.max_diff_time = params.min_diff_time;

    let (mut engine, ticks, orders) = engine(params, PositionLimits::default(), 0.0);
    engine.run(1);

    let ticks = ticks.ticks();
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].timestamp, Duration::from_millis(100));
    assert!((ticks[0].price - 100.0).abs() < 1e-3);
    // A single tick never produces a signal.
    assert_eq!(orders.order_count(), 0);
}

#[test]
fn volatile_run_respects_limits_and_journals_every_order() {
    let limits = PositionLimits::new(-150.0, 150.0);
    let (mut engine, ticks, orders) = engine(market(0.8), limits, 20.0);

    for _ in 0..5_000 {
        engine.step();
        let pm = engine.handler().signals();
        assert!(limits.contains(pm.position()));
    }

    assert_eq!(ticks.tick_count(), 5_000);
    let pm = engine.handler().signals();
    let stats = pm.stats();
    assert_eq!(orders.order_count() as u64, stats.submitted);
    assert_eq!(stats.submitted, stats.executed + stats.rejected);

    for record in orders.orders() {
        assert!(record.volume > 0.0);
        assert!(matches!(
            record.status,
            ReplyStatus::Executed | ReplyStatus::Rejected
        ));
    }
}

#[test]
fn realized_pnl_matches_executed_cash_flows() {
    let (mut engine, _, orders) = engine(market(0.8), PositionLimits::default(), 10.0);
    engine.run(3_000);

    let pm = engine.handler().signals();
    let (cash, position) = orders
        .orders()
        .iter()
        .filter(|r| r.status == ReplyStatus::Executed)
        .fold((0.0, 0.0), |(cash, pos), r| match r.side {
            tradesim_core::OrderSide::Buy => (cash - r.price * r.volume, pos + r.volume),
            tradesim_core::OrderSide::Sell => (cash + r.price * r.volume, pos - r.volume),
        });

    assert!((pm.realized_pnl() - cash).abs() < 1e-6 * (1.0 + cash.abs()));
    assert!((pm.position() - position).abs() < 1e-6);
}

#[test]
fn strategy_drives_position_manager_on_crossover() {
    let orders = MemoryJournal::new();
    let pm = PositionManager::new(PositionLimits::default(), 0.0, orders.clone());
    let mut strategy =
        CrossoverStrategy::new(Duration::from_secs(1), Duration::from_secs(5), pm);

    strategy.on_tick(&Tick::new(Duration::from_millis(100), 100.0, 10.0));
    strategy.on_tick(&Tick::new(Duration::from_millis(200), 105.0, 10.0));

    let records = orders.orders();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price, 105.0);
    assert_eq!(records[0].volume, 10.0);
    assert_eq!(strategy.signals().position(), 10.0);
    assert_eq!(strategy.signals().realized_pnl(), -1050.0);
}
