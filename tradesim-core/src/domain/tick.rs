//! Tick: one simulated market observation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Price, Volume};

/// A single market observation produced once per simulation step.
///
/// `timestamp` is the elapsed simulation time since start, not wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: Duration,
    pub price: Price,
    pub volume: Volume,
}

impl Tick {
    pub fn new(timestamp: Duration, price: Price, volume: Volume) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }

    /// Returns true if the price is finite and strictly positive.
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_price_validity() {
        let t = Duration::from_millis(100);
        assert!(Tick::new(t, 100.0, 5.0).has_valid_price());
        assert!(!Tick::new(t, 0.0, 5.0).has_valid_price());
        assert!(!Tick::new(t, f64::NAN, 5.0).has_valid_price());
        assert!(!Tick::new(t, f64::INFINITY, 5.0).has_valid_price());
    }
}
