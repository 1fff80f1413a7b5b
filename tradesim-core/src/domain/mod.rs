//! Domain types for the trading simulator

pub mod ids;
pub mod order;
pub mod tick;

pub use ids::OrderId;
pub use order::{is_volume_equal, Order, OrderSide, ReplyStatus, VOLUME_EPSILON};
pub use tick::Tick;

/// Price in quote currency units.
pub type Price = f64;

/// Traded quantity. Signed when used as a net position.
pub type Volume = f64;
