//! Dual time-EMA crossover.
//!
//! Fires a buy when the fast EMA moves above the slow EMA and a sell when it
//! drops back to or below it. Signals fire on transitions only: never on the
//! first tick, never twice in a row for the same ordering.

use std::time::Duration;

use crate::domain::{Price, Tick};
use crate::indicators::TimeEma;

use super::{SignalHandler, TickHandler};

/// Which EMA was on top after the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverState {
    Uninitialized,
    FastHigher,
    SlowHigher,
}

#[derive(Debug)]
pub struct CrossoverStrategy<S> {
    fast: TimeEma,
    slow: TimeEma,
    state: CrossoverState,
    signals: S,
}

impl<S: SignalHandler> CrossoverStrategy<S> {
    pub fn new(fast_period: Duration, slow_period: Duration, signals: S) -> Self {
        assert!(
            slow_period > fast_period,
            "slow EMA period must be > fast EMA period"
        );
        Self {
            fast: TimeEma::new(fast_period),
            slow: TimeEma::new(slow_period),
            state: CrossoverState::Uninitialized,
            signals,
        }
    }

    pub fn state(&self) -> CrossoverState {
        self.state
    }

    pub fn fast_ema(&self) -> Price {
        self.fast.current_price()
    }

    pub fn slow_ema(&self) -> Price {
        self.slow.current_price()
    }

    pub fn signals(&self) -> &S {
        &self.signals
    }
}

impl<S: SignalHandler> TickHandler for CrossoverStrategy<S> {
    fn on_tick(&mut self, tick: &Tick) {
        self.slow.update(tick);
        self.fast.update(tick);

        // Ties fall through to the slow branch.
        if self.fast.current_price() > self.slow.current_price() {
            if self.state == CrossoverState::SlowHigher {
                self.signals.on_buy_signal(tick.price, tick.volume);
            }
            self.state = CrossoverState::FastHigher;
        } else {
            if self.state == CrossoverState::FastHigher {
                self.signals.on_sell_signal(tick.price, tick.volume);
            }
            self.state = CrossoverState::SlowHigher;
        }
    }
}
