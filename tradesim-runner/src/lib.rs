//! TradeSim Runner: configuration, CSV journals, and simulation orchestration.
//!
//! This crate builds on `tradesim-core` to provide:
//! - TOML configuration with duration literals, defaults, and validation
//! - CSV tick and order journals
//! - `run_simulation()` returning a serializable `SimulationReport`

pub mod config;
pub mod journal;
pub mod runner;

pub use config::{format_duration, parse_duration, ConfigError, ConfigSource, SimConfig};
pub use journal::{JournalOpenError, OrderCsvJournal, TickCsvJournal};
pub use runner::{build_engine, run_simulation, run_with_journals, RunError, SimulationReport};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<SimConfig>();
        assert_sync::<SimConfig>();
    }

    #[test]
    fn simulation_report_is_send_sync() {
        assert_send::<SimulationReport>();
        assert_sync::<SimulationReport>();
    }

    #[test]
    fn error_types_are_send_sync() {
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
