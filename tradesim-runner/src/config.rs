//! Simulation configuration: TOML file with `[price]`, `[trade]`,
//! `[exchange]` and `[simulation]` tables.
//!
//! Every key is optional and falls back to its default. Durations are
//! written as `<integer><unit>` literals such as `"100ms"` or `"24h"`.
//! Validation runs on load; the engine assumes a validated config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradesim_core::position::PositionLimits;
use tradesim_core::simulation::{GbmParams, MarketParams};

/// Errors from loading, validating, or writing a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: &'static str },
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Where a configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Loaded,
    CreatedDefault,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub price: PriceConfig,
    pub trade: TradeConfig,
    pub exchange: ExchangeConfig,
    pub simulation: SimulationConfig,
}

/// Price path parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    pub initial_price: f64,
    /// GBM drift per `time_horizon`.
    pub average_trend_value: f64,
    /// GBM volatility per `time_horizon`.
    pub price_variation: f64,
    #[serde(with = "duration_literal")]
    pub time_horizon: Duration,
    #[serde(with = "duration_literal")]
    pub min_diff_time: Duration,
    #[serde(with = "duration_literal")]
    pub max_diff_time: Duration,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            average_trend_value: 0.05,
            price_variation: 0.10,
            time_horizon: Duration::from_secs(24 * 3600),
            min_diff_time: Duration::from_millis(100),
            max_diff_time: Duration::from_millis(200),
        }
    }
}

/// Strategy and position parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    #[serde(with = "duration_literal")]
    pub fast_ema: Duration,
    #[serde(with = "duration_literal")]
    pub slow_ema: Duration,
    pub min_volume: f64,
    pub max_volume: f64,
    pub min_position: f64,
    pub max_position: f64,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            fast_ema: Duration::from_secs(1),
            slow_ema: Duration::from_secs(5),
            min_volume: 1.0,
            max_volume: 1000.0,
            min_position: -1000.0,
            max_position: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Chance in percent (0–100) that the exchange rejects an order.
    pub rejection_probability: f64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rejection_probability: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub steps_count: u64,
    pub price_evolution_path: PathBuf,
    pub orders_log_path: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_count: 100_000,
            price_evolution_path: PathBuf::from("output/price_evolution.csv"),
            orders_log_path: PathBuf::from("output/orders.csv"),
        }
    }
}

impl SimConfig {
    /// Parse a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content.trim_start_matches('\u{feff}'))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, otherwise write the defaults there and return them.
    pub fn load_or_create(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let exists = path.try_exists().map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if exists {
            return Ok((Self::load(path)?, ConfigSource::Loaded));
        }

        let config = Self::write_default(path)?;
        Ok((config, ConfigSource::CreatedDefault))
    }

    /// Write the default configuration to `path`, creating parent directories.
    pub fn write_default(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::default();
        let content = config.to_toml_string()?;

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)?;

        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the relationships the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.price;
        let t = &self.trade;
        let one_ns = Duration::from_nanos(1);

        let checks: [(bool, &'static str); 14] = [
            (p.initial_price >= 0.0, "initial_price must be >= 0"),
            (p.time_horizon >= one_ns, "time_horizon must be >= 1ns"),
            (p.min_diff_time >= one_ns, "min_diff_time must be >= 1ns"),
            (
                p.min_diff_time < p.max_diff_time,
                "min_diff_time must be < max_diff_time",
            ),
            (t.fast_ema >= one_ns, "fast_ema must be >= 1ns"),
            (t.slow_ema > t.fast_ema, "slow_ema must be > fast_ema"),
            (t.min_volume >= 0.0, "min_volume must be >= 0"),
            (t.max_volume >= t.min_volume, "max_volume must be >= min_volume"),
            (
                t.max_position >= t.min_position,
                "max_position must be >= min_position",
            ),
            (
                self.exchange.rejection_probability >= 0.0,
                "rejection_probability must be between 0.0 and 100.0",
            ),
            (
                self.exchange.rejection_probability <= 100.0,
                "rejection_probability must be between 0.0 and 100.0",
            ),
            (self.simulation.steps_count >= 1, "steps_count must be >= 1"),
            (
                p.initial_price.is_finite()
                    && p.average_trend_value.is_finite()
                    && p.price_variation.is_finite(),
                "price parameters must be finite",
            ),
            (
                t.min_volume.is_finite()
                    && t.max_volume.is_finite()
                    && t.min_position.is_finite()
                    && t.max_position.is_finite(),
                "volume and position limits must be finite",
            ),
        ];

        match checks.iter().find(|(ok, _)| !*ok) {
            Some((_, rule)) => Err(ConfigError::Invalid(*rule)),
            None => Ok(()),
        }
    }

    pub fn market_params(&self) -> MarketParams {
        MarketParams {
            initial_price: self.price.initial_price,
            gbm: GbmParams {
                average_trend_value: self.price.average_trend_value,
                price_variation: self.price.price_variation,
                time_horizon: self.price.time_horizon,
            },
            min_diff_time: self.price.min_diff_time,
            max_diff_time: self.price.max_diff_time,
            min_volume: self.trade.min_volume,
            max_volume: self.trade.max_volume,
        }
    }

    pub fn position_limits(&self) -> PositionLimits {
        PositionLimits::new(self.trade.min_position, self.trade.max_position)
    }
}

// ── Duration literals ───────────────────────────────────────────────

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Units from largest to smallest; formatting picks the first that divides evenly.
const UNITS: [(&str, u64); 9] = [
    ("y", 31_556_952 * NANOS_PER_SEC),
    ("m", 2_629_746 * NANOS_PER_SEC),
    ("d", 86_400 * NANOS_PER_SEC),
    ("h", 3_600 * NANOS_PER_SEC),
    ("min", 60 * NANOS_PER_SEC),
    ("s", NANOS_PER_SEC),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

/// Parse a duration literal such as `"250ms"`, `"5 s"` or `"1y"`.
///
/// `m` is months; use `min` for minutes.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason| ConfigError::InvalidDuration {
        input: input.to_string(),
        reason,
    };

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(invalid("empty duration"));
    }

    let split = compact
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| invalid("missing unit"))?;
    let (digits, unit) = compact.split_at(split);
    if digits.is_empty() {
        return Err(invalid("expected a non-negative integer before the unit"));
    }

    let scale = UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, scale)| *scale)
        .ok_or_else(|| invalid("unknown unit (expected y, m, d, h, min, s, ms, us, ns)"))?;

    let value: u64 = digits.parse().map_err(|_| invalid("number out of range"))?;
    let nanos = value
        .checked_mul(scale)
        .filter(|n| *n <= i64::MAX as u64)
        .ok_or_else(|| invalid("duration overflows"))?;

    Ok(Duration::from_nanos(nanos))
}

/// Render a duration with the largest unit that divides it evenly.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0ns".to_string();
    }
    for (name, scale) in UNITS {
        let scale = scale as u128;
        if nanos % scale == 0 {
            return format!("{}{name}", nanos / scale);
        }
    }
    format!("{nanos}ns")
}

mod duration_literal {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
