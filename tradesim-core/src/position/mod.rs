//! Position management: bound enforcement, order submission, PnL tracking.

pub mod limits;
pub mod manager;

pub use limits::PositionLimits;
pub use manager::{OrderStats, PositionManager};
