mod config;
mod monitoring;
mod price_monitor;
mod store;
mod ticker;

pub use config::{Config, ConfigError};
pub use monitoring::FlightMonitoring;
pub use price_monitor::{PriceMonitor, PRICE_RANGE};
pub use store::MemoryFlightStore;
pub use ticker::Ticker;
