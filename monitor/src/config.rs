use std::env;
use std::str::FromStr;
use std::time::Duration;

use schema::FlightId;
use thiserror::Error;

use crate::PriceMonitor;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub price_update_interval: Duration,
    pub display_interval: Duration,
    /// Seed for the synthetic price sequence
    pub price_seed: u64,
    /// Flights whose prices are updated
    pub followed_flights: Vec<FlightId>,
    /// Flights which are displayed
    pub monitored_flights: Vec<FlightId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            price_update_interval: Duration::from_millis(500),
            display_interval: Duration::from_millis(500),
            price_seed: PriceMonitor::DEFAULT_SEED,
            followed_flights: parse_flights("PaAt,AmNY,LoMi,FrWa"),
            monitored_flights: parse_flights("LoMi,FrWa"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source, falling back to defaults for missing keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            price_update_interval: interval(&lookup, "PRICE_UPDATE_INTERVAL_MS")?
                .unwrap_or(defaults.price_update_interval),
            display_interval: interval(&lookup, "DISPLAY_INTERVAL_MS")?
                .unwrap_or(defaults.display_interval),
            price_seed: parse(&lookup, "PRICE_SEED")?.unwrap_or(defaults.price_seed),
            followed_flights: lookup("FOLLOWED_FLIGHTS")
                .map(|s| parse_flights(&s))
                .unwrap_or(defaults.followed_flights),
            monitored_flights: lookup("MONITORED_FLIGHTS")
                .map(|s| parse_flights(&s))
                .unwrap_or(defaults.monitored_flights),
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}

fn interval(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match parse::<u64>(lookup, key)? {
        Some(0) => Err(ConfigError::ZeroInterval(key)),
        millis => Ok(millis.map(Duration::from_millis)),
    }
}

fn parse_flights(s: &str) -> Vec<FlightId> {
    s.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(FlightId::from)
        .collect()
}
