//! Orders, sides, and exchange reply status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Price, Volume};

/// Absolute tolerance for comparing volumes at position boundaries.
///
/// Two volumes are equal only if they differ by strictly less than this value.
pub const VOLUME_EPSILON: Volume = 1e-9;

/// Volume equality within [`VOLUME_EPSILON`] (strict).
pub fn is_volume_equal(a: Volume, b: Volume) -> bool {
    (a - b).abs() < VOLUME_EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// +1 for Buy, -1 for Sell. Applied to volume when updating the net position.
    pub fn position_sign(self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }

    /// Cash flow sign: buying spends cash, selling receives it.
    pub fn cash_sign(self) -> f64 {
        -self.position_sign()
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "Buy"),
            OrderSide::Sell => write!(f, "Sell"),
        }
    }
}

/// Exchange reply state. Only `Executed` and `Rejected` are ever delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplyStatus {
    Pending,
    Executed,
    Rejected,
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyStatus::Pending => write!(f, "Pending"),
            ReplyStatus::Executed => write!(f, "Executed"),
            ReplyStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// An order submitted to the simulated exchange at a fixed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub side: OrderSide,
    pub price: Price,
    pub volume: Volume,
}

impl Order {
    pub fn buy(price: Price, volume: Volume) -> Self {
        Self {
            side: OrderSide::Buy,
            price,
            volume,
        }
    }

    pub fn sell(price: Price, volume: Volume) -> Self {
        Self {
            side: OrderSide::Sell,
            price,
            volume,
        }
    }

    /// Signed notional cash flow if this order executes.
    pub fn cash_flow(&self) -> f64 {
        self.price * self.volume * self.side.cash_sign()
    }

    /// Signed change in net position if this order executes.
    pub fn position_delta(&self) -> Volume {
        self.volume * self.side.position_sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_equality_is_strict_at_epsilon() {
        assert!(is_volume_equal(1.0, 1.0));
        assert!(is_volume_equal(100.0, 100.0 + VOLUME_EPSILON / 2.0));
        // A difference of exactly the tolerance does not count as equal.
        assert!(!is_volume_equal(0.0, VOLUME_EPSILON));
        assert!(!is_volume_equal(0.0, -VOLUME_EPSILON));
    }

    #[test]
    fn buy_order_flows() {
        let order = Order::buy(100.0, 5.0);
        assert_eq!(order.cash_flow(), -500.0);
        assert_eq!(order.position_delta(), 5.0);
    }

    #[test]
    fn sell_order_flows() {
        let order = Order::sell(50.0, 2.0);
        assert_eq!(order.cash_flow(), 100.0);
        assert_eq!(order.position_delta(), -2.0);
    }

    #[test]
    fn display_names_match_journal_columns() {
        assert_eq!(OrderSide::Buy.to_string(), "Buy");
        assert_eq!(OrderSide::Sell.to_string(), "Sell");
        assert_eq!(ReplyStatus::Executed.to_string(), "Executed");
        assert_eq!(ReplyStatus::Rejected.to_string(), "Rejected");
        assert_eq!(ReplyStatus::Pending.to_string(), "Pending");
    }
}
