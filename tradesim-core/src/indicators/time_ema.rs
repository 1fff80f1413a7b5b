//! Time-weighted Exponential Moving Average.
//!
//! Decay depends on elapsed simulation time rather than tick count, so
//! irregular tick spacing does not distort smoothing:
//!
//! alpha = 1 - exp(-dt / tau)
//! EMA[t] = EMA[t-1] + alpha * (price[t] - EMA[t-1])
//!
//! Seed: the first observed price.

use std::time::Duration;

use crate::domain::{Price, Tick};

#[derive(Debug, Clone)]
pub struct TimeEma {
    neg_inv_tau: f64,
    current: Price,
    last_update: Option<Duration>,
}

impl TimeEma {
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "EMA period must be > 0");
        Self {
            neg_inv_tau: -1.0 / period.as_secs_f64(),
            current: 0.0,
            last_update: None,
        }
    }

    /// Fold a tick into the average and return the updated value.
    ///
    /// Ticks whose timestamp is not strictly after the last accepted update
    /// leave the average and the stored timestamp untouched.
    pub fn update(&mut self, tick: &Tick) -> Price {
        let Some(last) = self.last_update else {
            self.current = tick.price;
            self.last_update = Some(tick.timestamp);
            return self.current;
        };

        if tick.timestamp <= last {
            return self.current;
        }

        let dt_sec = (tick.timestamp - last).as_secs_f64();
        let alpha = 1.0 - (dt_sec * self.neg_inv_tau).exp();
        self.current += alpha * (tick.price - self.current);
        self.last_update = Some(tick.timestamp);

        self.current
    }

    /// Current average. 0.0 until the first update.
    pub fn current_price(&self) -> Price {
        self.current
    }

    pub fn last_update(&self) -> Option<Duration> {
        self.last_update
    }

    pub fn is_seeded(&self) -> bool {
        self.last_update.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn tick(ms: u64, price: f64) -> Tick {
        Tick::new(Duration::from_millis(ms), price, 1.0)
    }

    #[test]
    fn fresh_ema_is_zero() {
        let ema = TimeEma::new(Duration::from_secs(1));
        assert_eq!(ema.current_price(), 0.0);
        assert!(!ema.is_seeded());
    }

    #[test]
    fn first_update_returns_price() {
        let mut ema = TimeEma::new(Duration::from_secs(1));
        assert_eq!(ema.update(&tick(100, 123.45)), 123.45);
        assert_eq!(ema.current_price(), 123.45);
        assert_eq!(ema.last_update(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn one_tau_step_known_value() {
        // dt = tau → alpha = 1 - e^-1
        let mut ema = TimeEma::new(Duration::from_secs(1));
        ema.update(&tick(0, 100.0));
        let v = ema.update(&tick(1000, 200.0));
        let alpha = 1.0 - (-1.0_f64).exp();
        assert_approx(v, 100.0 + alpha * 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn duplicate_timestamp_is_ignored() {
        let mut ema = TimeEma::new(Duration::from_secs(1));
        ema.update(&tick(500, 100.0));
        let v = ema.update(&tick(500, 900.0));
        assert_eq!(v, 100.0);
        assert_eq!(ema.current_price(), 100.0);
    }

    #[test]
    fn backwards_timestamp_is_ignored_and_not_recorded() {
        let mut ema = TimeEma::new(Duration::from_secs(1));
        ema.update(&tick(1000, 100.0));
        ema.update(&tick(400, 900.0));
        assert_eq!(ema.current_price(), 100.0);
        assert_eq!(ema.last_update(), Some(Duration::from_millis(1000)));

        // Next valid step measures dt from the last accepted update.
        let v = ema.update(&tick(2000, 200.0));
        let alpha = 1.0 - (-1.0_f64).exp();
        assert_approx(v, 100.0 + alpha * 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn converges_after_five_periods() {
        let mut ema = TimeEma::new(Duration::from_millis(200));
        ema.update(&tick(0, 50.0));
        let v = ema.update(&tick(1000, 100.0));
        assert!((v - 100.0).abs() / 100.0 < 0.01, "ema={v}");
    }

    #[test]
    fn shorter_period_reacts_faster() {
        let mut fast = TimeEma::new(Duration::from_secs(1));
        let mut slow = TimeEma::new(Duration::from_secs(5));
        for (ms, p) in [(0, 100.0), (100, 110.0), (200, 120.0)] {
            fast.update(&tick(ms, p));
            slow.update(&tick(ms, p));
        }
        assert!(fast.current_price() > slow.current_price());
    }
}
