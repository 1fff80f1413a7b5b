//! Simulated exchange with deferred reply delivery.

pub mod simulated;

pub use simulated::{ReplyCallback, SimulatedExchange, REJECTION_REASON};
