//! Trading strategy traits and the EMA crossover strategy.
//!
//! Two seams:
//! - `TickHandler`: consumes each simulated tick (implemented by strategies).
//! - `SignalHandler`: receives buy/sell signals (implemented by `PositionManager`).

pub mod crossover;

pub use crossover::{CrossoverState, CrossoverStrategy};

use crate::domain::{Price, Tick, Volume};

pub trait TickHandler {
    fn on_tick(&mut self, tick: &Tick);
}

pub trait SignalHandler {
    fn on_buy_signal(&mut self, price: Price, volume: Volume);
    fn on_sell_signal(&mut self, price: Price, volume: Volume);
}
