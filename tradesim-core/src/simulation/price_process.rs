//! Price process: the driving loop.
//!
//! Each step:
//! 1. draws dt uniformly from [min_diff_time, max_diff_time] and advances the clock
//! 2. moves the price one GBM step
//! 3. draws a trade volume uniformly from [min_volume, max_volume]
//! 4. journals the tick (failures are logged, not fatal) and hands it to the strategy
//!
//! The generator is seeded from OS entropy at construction; runs are not reproducible.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::domain::{Price, Tick, Volume};
use crate::journal::TickSink;
use crate::strategy::TickHandler;

use super::GbmParams;

/// Parameters of the synthetic market.
///
/// Assumed pre-validated: `min_diff_time <= max_diff_time`,
/// `min_volume <= max_volume`, non-zero `time_horizon`.
/// Step lengths saturate at `u64::MAX` nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    pub initial_price: Price,
    pub gbm: GbmParams,
    pub min_diff_time: Duration,
    pub max_diff_time: Duration,
    pub min_volume: Volume,
    pub max_volume: Volume,
}

pub struct PriceProcess<H> {
    params: MarketParams,
    current: Tick,
    steps_taken: u64,
    sink: Box<dyn TickSink>,
    handler: H,
    rng: StdRng,
}

impl<H: TickHandler> PriceProcess<H> {
    pub fn new(params: MarketParams, sink: impl TickSink + 'static, handler: H) -> Self {
        Self {
            params,
            current: Tick::new(Duration::ZERO, params.initial_price, 0.0),
            steps_taken: 0,
            sink: Box::new(sink),
            handler,
            rng: StdRng::from_entropy(),
        }
    }

    /// Last produced tick. Before the first step: time zero at the initial price.
    pub fn current_tick(&self) -> Tick {
        self.current
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Run `steps` iterations.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Advance one iteration and return the produced tick.
    pub fn step(&mut self) -> Tick {
        let dt = self.random_dt();
        let z: f64 = self.rng.sample(StandardNormal);
        let price = self.params.gbm.next_price(self.current.price, dt, z);
        let volume = self.random_volume();

        self.current = Tick::new(self.current.timestamp + dt, price, volume);
        self.steps_taken += 1;

        if let Err(e) = self.sink.write_tick(&self.current) {
            tracing::warn!(error = %e, step = self.steps_taken, "tick journal write failed");
        }
        self.handler.on_tick(&self.current);

        self.current
    }

    fn random_dt(&mut self) -> Duration {
        let min = u64::try_from(self.params.min_diff_time.as_nanos()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.params.max_diff_time.as_nanos()).unwrap_or(u64::MAX);
        Duration::from_nanos(self.rng.gen_range(min..=max))
    }

    fn random_volume(&mut self) -> Volume {
        self.rng
            .gen_range(self.params.min_volume..=self.params.max_volume)
    }
}

impl<H: std::fmt::Debug> std::fmt::Debug for PriceProcess<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceProcess")
            .field("params", &self.params)
            .field("current", &self.current)
            .field("steps_taken", &self.steps_taken)
            .field("handler", &self.handler)
            .finish()
    }
}
