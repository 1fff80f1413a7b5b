//! Price path simulation.

pub mod gbm;
pub mod price_process;

pub use gbm::{gbm_step, GbmParams};
pub use price_process::{MarketParams, PriceProcess};
