//! Geometric Brownian Motion step.
//!
//! price_next = price * exp((mu - sigma^2 / 2) * f + sigma * sqrt(f) * z)
//!
//! where `f` is the step length as a fraction of the time horizon and `z` is
//! a standard normal draw. The step is log-normal, so a positive price stays
//! positive for any finite inputs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::Price;

/// Drift and volatility, both expressed per `time_horizon`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    /// Drift (mu).
    pub average_trend_value: f64,
    /// Volatility (sigma).
    pub price_variation: f64,
    pub time_horizon: Duration,
}

impl GbmParams {
    /// Step length as a fraction of the horizon, in integer nanoseconds.
    pub fn time_fraction(&self, dt: Duration) -> f64 {
        dt.as_nanos() as f64 / self.time_horizon.as_nanos() as f64
    }

    pub fn next_price(&self, price: Price, dt: Duration, z: f64) -> Price {
        gbm_step(
            price,
            self.time_fraction(dt),
            self.average_trend_value,
            self.price_variation,
            z,
        )
    }
}

pub fn gbm_step(price: Price, fraction: f64, trend: f64, variation: f64, z: f64) -> Price {
    let drift = (trend - 0.5 * variation * variation) * fraction;
    let diffusion = variation * fraction.sqrt() * z;
    price * (drift + diffusion).exp()
}
