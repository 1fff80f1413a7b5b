//! TradeSim Core: the closed-loop simulation engine.
//!
//! One tick flows one way per step:
//! `PriceProcess` → `CrossoverStrategy` → `PositionManager` → `SimulatedExchange`,
//! and the exchange reply comes back to the `PositionManager` within the same call.
//!
//! - Domain types (ticks, orders, reply status, order ids)
//! - Time-weighted EMA
//! - Simulated exchange with deferred replies and random rejection
//! - Position manager with bound clamping and PnL tracking
//! - Dual-EMA crossover strategy
//! - GBM price process
//! - Journal sink traits for ticks and resolved orders
//!
//! Everything is single-threaded and synchronous.

pub mod domain;
pub mod exchange;
pub mod indicators;
pub mod journal;
pub mod position;
pub mod simulation;
pub mod strategy;

pub use domain::{Order, OrderId, OrderSide, Price, ReplyStatus, Tick, Volume};
pub use exchange::SimulatedExchange;
pub use indicators::TimeEma;
pub use journal::{JournalError, MemoryJournal, NullJournal, OrderRecord, OrderSink, TickSink};
pub use position::{OrderStats, PositionLimits, PositionManager};
pub use simulation::{GbmParams, MarketParams, PriceProcess};
pub use strategy::{CrossoverState, CrossoverStrategy, SignalHandler, TickHandler};

/// The fully wired engine: price process driving a crossover strategy
/// that trades through a position manager.
pub type Engine = PriceProcess<CrossoverStrategy<PositionManager>>;
